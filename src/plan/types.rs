use serde::{Deserialize, Serialize};

/// One anticipated question and its canned answer. Both fields are
/// trimmed, non-empty, and free of the plan-text markers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QaPair {
    pub question: String,
    pub answer: String,
}

/// One planned system utterance plus its anticipated Q&A.
/// `qa_pairs` may be empty; the turn is still presented.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub utterance: String,
    pub qa_pairs: Vec<QaPair>,
}

/// The full ordered sequence of turns for one session. Built once by
/// the parser, read-only afterwards; source order is presentation order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    pub turns: Vec<Turn>,
}

impl Plan {
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}
