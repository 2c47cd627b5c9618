use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;

use newstalk::engine::traits::{AckClassifier, FallbackAnswerer, InputSource, OutputSink};
use newstalk::engine::{Engine, EngineConfig};
use newstalk::plan::{Plan, QaPair, Turn};

// --- Stub collaborators -------------------------------------------------

/// Counts calls; treats a fixed set of strings as acknowledgements.
#[derive(Clone, Default)]
struct StubClassifier {
    calls: Arc<AtomicUsize>,
    acks: Vec<String>,
}

#[async_trait]
impl AckClassifier for StubClassifier {
    async fn is_acknowledgement(&self, utterance: &str) -> bool {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.acks.iter().any(|a| a == utterance)
    }
}

/// Records every (context, question) it was asked; optionally fails.
#[derive(Clone, Default)]
struct StubFallback {
    calls: Arc<Mutex<Vec<(String, String)>>>,
    fail: bool,
}

#[async_trait]
impl FallbackAnswerer for StubFallback {
    async fn answer(&self, context: &str, question: &str) -> Result<String> {
        self.calls
            .lock()
            .unwrap()
            .push((context.to_string(), question.to_string()));
        if self.fail {
            Err(anyhow!("backend down"))
        } else {
            Ok("補足回答です。".to_string())
        }
    }
}

/// Scripted input; `None` entries simulate a timed-out wait, and an
/// exhausted script times out forever.
struct ScriptedInput {
    lines: VecDeque<Option<String>>,
}

impl ScriptedInput {
    fn new(lines: Vec<Option<&str>>) -> Self {
        Self {
            lines: lines
                .into_iter()
                .map(|l| l.map(str::to_string))
                .collect(),
        }
    }
}

#[async_trait]
impl InputSource for ScriptedInput {
    async fn read_line(&mut self, _timeout: Duration) -> Option<String> {
        self.lines.pop_front().flatten()
    }
}

#[derive(Clone, Default)]
struct RecordingSink {
    lines: Arc<Mutex<Vec<String>>>,
}

impl RecordingSink {
    fn recorded(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }
}

impl OutputSink for RecordingSink {
    fn line(&mut self, text: &str) {
        self.lines.lock().unwrap().push(text.to_string());
    }

    fn prompt(&mut self, _text: &str) {}
}

// --- Fixtures -----------------------------------------------------------

fn contract_plan() -> Plan {
    Plan {
        turns: vec![Turn {
            utterance: "契約は10年です。".to_string(),
            qa_pairs: vec![QaPair {
                question: "何年？".to_string(),
                answer: "10年です。".to_string(),
            }],
        }],
    }
}

fn two_turn_plan() -> Plan {
    Plan {
        turns: vec![
            Turn {
                utterance: "一つ目の発話です。".to_string(),
                qa_pairs: vec![QaPair {
                    question: "質問？".to_string(),
                    answer: "回答。".to_string(),
                }],
            },
            Turn {
                utterance: "二つ目の発話です。".to_string(),
                qa_pairs: vec![],
            },
        ],
    }
}

// --- Tests --------------------------------------------------------------

#[tokio::test]
async fn test_empty_plan_emits_nothing() {
    let classifier = StubClassifier::default();
    let fallback = StubFallback::default();
    let sink = RecordingSink::default();

    let mut engine = Engine::new(
        EngineConfig::default(),
        classifier.clone(),
        fallback.clone(),
        ScriptedInput::new(vec![]),
        sink.clone(),
    );
    engine.run(&Plan::default()).await;

    assert!(sink.recorded().is_empty());
    assert_eq!(classifier.calls.load(Ordering::SeqCst), 0);
    assert!(fallback.calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_timeout_advances_without_consulting_collaborators() {
    let classifier = StubClassifier::default();
    let fallback = StubFallback::default();
    let sink = RecordingSink::default();

    let mut engine = Engine::new(
        EngineConfig::default(),
        classifier.clone(),
        fallback.clone(),
        // Script is empty: every wait times out.
        ScriptedInput::new(vec![]),
        sink.clone(),
    );
    engine.run(&two_turn_plan()).await;

    assert_eq!(
        sink.recorded(),
        vec![
            "\nシステム: 一つ目の発話です。",
            "（無反応のため次の発話に進みます）",
            "\nシステム: 二つ目の発話です。",
            "（無反応のため次の発話に進みます）",
        ]
    );
    assert_eq!(classifier.calls.load(Ordering::SeqCst), 0);
    assert!(fallback.calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_acknowledgement_advances_without_answering() {
    let classifier = StubClassifier {
        acks: vec!["うん".to_string()],
        ..Default::default()
    };
    let fallback = StubFallback::default();
    let sink = RecordingSink::default();

    let mut engine = Engine::new(
        EngineConfig::default(),
        classifier.clone(),
        fallback.clone(),
        ScriptedInput::new(vec![Some("うん"), Some("うん")]),
        sink.clone(),
    );
    engine.run(&two_turn_plan()).await;

    // Both turns presented; the acknowledgements produced no answers
    // and never reached the matcher or the fallback path.
    assert_eq!(
        sink.recorded(),
        vec![
            "\nシステム: 一つ目の発話です。",
            "\nシステム: 二つ目の発話です。",
        ]
    );
    assert_eq!(classifier.calls.load(Ordering::SeqCst), 2);
    assert!(fallback.calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_close_match_reuses_planned_answer() {
    let classifier = StubClassifier::default();
    let fallback = StubFallback::default();
    let sink = RecordingSink::default();

    let mut engine = Engine::new(
        EngineConfig::default(),
        classifier.clone(),
        fallback.clone(),
        ScriptedInput::new(vec![Some("何年契約？")]),
        sink.clone(),
    );
    engine.run(&contract_plan()).await;

    assert_eq!(
        sink.recorded(),
        vec![
            "\nシステム: 契約は10年です。",
            "システム: 10年です。",
            "（無反応のため次の発話に進みます）",
        ]
    );
    // Above the threshold, the fallback generator is never invoked.
    assert!(fallback.calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_distant_question_invokes_fallback_once() {
    let classifier = StubClassifier::default();
    let fallback = StubFallback::default();
    let sink = RecordingSink::default();

    let mut engine = Engine::new(
        EngineConfig::default(),
        classifier.clone(),
        fallback.clone(),
        ScriptedInput::new(vec![Some("契約の通貨は？")]),
        sink.clone(),
    );
    engine.run(&contract_plan()).await;

    assert_eq!(
        fallback.calls.lock().unwrap().clone(),
        vec![(
            "契約は10年です。".to_string(),
            "契約の通貨は？".to_string()
        )]
    );
    assert!(sink
        .recorded()
        .contains(&"システム: 補足回答です。".to_string()));
}

#[tokio::test]
async fn test_turn_without_pairs_always_falls_back() {
    let classifier = StubClassifier::default();
    let fallback = StubFallback::default();
    let sink = RecordingSink::default();

    let plan = Plan {
        turns: vec![Turn {
            utterance: "質問の用意がない発話です。".to_string(),
            qa_pairs: vec![],
        }],
    };

    let mut engine = Engine::new(
        EngineConfig::default(),
        classifier.clone(),
        fallback.clone(),
        ScriptedInput::new(vec![Some("それは何？")]),
        sink.clone(),
    );
    engine.run(&plan).await;

    assert_eq!(fallback.calls.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_same_turn_keeps_listening_after_answer() {
    let classifier = StubClassifier {
        acks: vec!["なるほど".to_string()],
        ..Default::default()
    };
    let fallback = StubFallback::default();
    let sink = RecordingSink::default();

    let mut engine = Engine::new(
        EngineConfig::default(),
        classifier.clone(),
        fallback.clone(),
        // Two follow-up questions about one utterance, then move on.
        ScriptedInput::new(vec![Some("何年？"), Some("何年契約？"), Some("なるほど")]),
        sink.clone(),
    );
    engine.run(&contract_plan()).await;

    assert_eq!(
        sink.recorded(),
        vec![
            "\nシステム: 契約は10年です。",
            "システム: 10年です。",
            "システム: 10年です。",
        ]
    );
}

#[tokio::test]
async fn test_fallback_failure_keeps_session_alive() {
    let classifier = StubClassifier {
        acks: vec!["うん".to_string()],
        ..Default::default()
    };
    let fallback = StubFallback {
        fail: true,
        ..Default::default()
    };
    let sink = RecordingSink::default();

    let mut engine = Engine::new(
        EngineConfig::default(),
        classifier.clone(),
        fallback.clone(),
        ScriptedInput::new(vec![Some("契約の通貨は？"), Some("うん")]),
        sink.clone(),
    );
    engine.run(&contract_plan()).await;

    // One visible failure line for the broken exchange, then the
    // session continued and finished normally.
    assert_eq!(
        sink.recorded(),
        vec![
            "\nシステム: 契約は10年です。",
            "システム: （回答を生成できませんでした）",
        ]
    );
    assert_eq!(fallback.calls.lock().unwrap().len(), 1);
}
