use once_cell::sync::Lazy;
use regex::Regex;

use super::types::{Plan, QaPair, Turn};

// Built-in Japanese plan convention. The literal marker text is a
// format parameter, not engine logic; swap it via `PlanFormat::new`.
static TURN_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"システム\(発話\d+\):").expect("built-in turn marker pattern"));
static QA_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^質問\d+\.(.*?)回答:(.*)$").expect("built-in QA line pattern"));

/// The textual convention the generator is asked to follow.
/// `turn_marker` splits the document into per-turn blocks; `qa_line`
/// must capture exactly two groups: question text and answer text.
#[derive(Debug, Clone)]
pub struct PlanFormat {
    turn_marker: Regex,
    qa_line: Regex,
}

impl Default for PlanFormat {
    fn default() -> Self {
        Self {
            turn_marker: TURN_MARKER.clone(),
            qa_line: QA_LINE.clone(),
        }
    }
}

impl PlanFormat {
    pub fn new(turn_marker: &str, qa_line: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            turn_marker: Regex::new(turn_marker)?,
            qa_line: Regex::new(qa_line)?,
        })
    }

    /// Turns a raw generator response into a `Plan`. Never fails:
    /// missing or malformed structure yields fewer turns, not an error.
    ///
    /// Each block after a turn marker contributes one turn. The first
    /// line of the block is the utterance; remaining lines are scanned
    /// against `qa_line`, and anything else (stray commentary from the
    /// generator) is skipped.
    pub fn parse(&self, text: &str) -> Plan {
        let mut turns = Vec::new();

        // Everything before the first marker is preamble, not a turn.
        for block in self.turn_marker.split(text).skip(1) {
            let mut lines = block.trim().lines();

            let utterance = match lines.next().map(str::trim) {
                Some(u) if !u.is_empty() => u.to_string(),
                // A blank turn cannot be presented.
                _ => continue,
            };

            let mut qa_pairs = Vec::new();
            for line in lines {
                let Some(caps) = self.qa_line.captures(line.trim()) else {
                    continue;
                };
                let question = caps[1].trim();
                let answer = caps[2].trim();
                if question.is_empty() || answer.is_empty() {
                    continue;
                }
                qa_pairs.push(QaPair {
                    question: question.to_string(),
                    answer: answer.to_string(),
                });
            }

            // A turn with no usable Q&A is still kept; every reply to it
            // will go through the fallback path.
            turns.push(Turn {
                utterance,
                qa_pairs,
            });
        }

        Plan { turns }
    }
}
