pub mod console;
pub mod traits;

use std::time::Duration;

use tracing::{info, warn};

use crate::matcher;
use crate::plan::Plan;

pub use console::{ConsoleInput, ConsoleOutput};
pub use traits::{AckClassifier, FallbackAnswerer, InputSource, OutputSink};

const NO_RESPONSE_NOTICE: &str = "（無反応のため次の発話に進みます）";
const FALLBACK_FAILED_NOTICE: &str = "システム: （回答を生成できませんでした）";

#[derive(Debug, Clone, Copy)]
pub struct EngineConfig {
    /// Bound on each wait for user input.
    pub input_timeout: Duration,
    /// Minimum similarity (exclusive) for reusing a planned answer.
    pub match_threshold: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            input_timeout: Duration::from_secs(20),
            match_threshold: 0.6,
        }
    }
}

/// Where the session currently stands. A turn only advances on an
/// acknowledgement or a timed-out wait, so the user can ask any number
/// of follow-up questions about one utterance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Presenting(usize),
    AwaitingInput(usize),
    Done,
}

/// The turn-taking orchestrator. Owns its collaborators; the plan is
/// read-only input to `run`.
pub struct Engine<C, F, I, O> {
    config: EngineConfig,
    classifier: C,
    fallback: F,
    input: I,
    sink: O,
}

impl<C, F, I, O> Engine<C, F, I, O>
where
    C: AckClassifier,
    F: FallbackAnswerer,
    I: InputSource,
    O: OutputSink,
{
    pub fn new(config: EngineConfig, classifier: C, fallback: F, input: I, sink: O) -> Self {
        Self {
            config,
            classifier,
            fallback,
            input,
            sink,
        }
    }

    /// Runs the session to completion. An empty plan terminates
    /// immediately without emitting anything.
    pub async fn run(&mut self, plan: &Plan) {
        let mut state = if plan.is_empty() {
            EngineState::Done
        } else {
            EngineState::Presenting(0)
        };

        loop {
            state = match state {
                EngineState::Presenting(i) => {
                    self.sink
                        .line(&format!("\nシステム: {}", plan.turns[i].utterance));
                    EngineState::AwaitingInput(i)
                }
                EngineState::AwaitingInput(i) => self.await_input(plan, i).await,
                EngineState::Done => break,
            };
        }
    }

    async fn await_input(&mut self, plan: &Plan, i: usize) -> EngineState {
        self.sink.prompt(&format!(
            "ユーザ（{}秒以内に入力してください）: ",
            self.config.input_timeout.as_secs()
        ));

        let Some(user_input) = self.input.read_line(self.config.input_timeout).await else {
            // The one path that moves on without consuming this turn's
            // Q&A; no classifier or matcher call happens here.
            self.sink.line(NO_RESPONSE_NOTICE);
            return Self::advance(plan, i);
        };

        if self.classifier.is_acknowledgement(&user_input).await {
            // Filler carries no content; drop it and move on.
            return Self::advance(plan, i);
        }

        let turn = &plan.turns[i];
        let matched = matcher::find_best(&user_input, &turn.qa_pairs);
        match matched.best {
            Some(pair) if matched.score > self.config.match_threshold => {
                info!(
                    score = matched.score,
                    user = %user_input,
                    planned = %pair.question,
                    "reusing planned answer"
                );
                self.sink.line(&format!("システム: {}", pair.answer));
            }
            _ => match self.fallback.answer(&turn.utterance, &user_input).await {
                Ok(answer) => self.sink.line(&format!("システム: {}", answer)),
                Err(e) => {
                    // One failed exchange never ends the session.
                    warn!("fallback answer failed: {e:#}");
                    self.sink.line(FALLBACK_FAILED_NOTICE);
                }
            },
        }

        EngineState::AwaitingInput(i)
    }

    fn advance(plan: &Plan, i: usize) -> EngineState {
        if i + 1 < plan.len() {
            EngineState::Presenting(i + 1)
        } else {
            EngineState::Done
        }
    }
}
