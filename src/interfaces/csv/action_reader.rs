use serde::Deserialize;
use std::io::Read;

use crate::error::{RealtimeError, Result};

#[derive(Debug, Deserialize, PartialEq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum ActionType {
    Submit,
    Approve,
    Reject,
    Notice,
}

/// One replay action. `submit` rows use `plan`/`amount`/`receipt_ref`;
/// `approve`/`reject` rows target the user's latest submission and carry
/// `notes`; `notice` rows broadcast `notes` as a system notification.
#[derive(Debug, Deserialize, PartialEq, Clone)]
pub struct ActionRecord {
    pub action: ActionType,
    pub user: String,
    #[serde(default)]
    pub plan: Option<String>,
    #[serde(default)]
    pub amount: Option<i64>,
    #[serde(default)]
    pub receipt_ref: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Reads replay actions from a CSV source.
///
/// This reader wraps `csv::Reader` and provides an iterator over
/// `Result<ActionRecord>`. It handles whitespace trimming and flexible
/// record lengths automatically.
pub struct ActionReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> ActionReader<R> {
    /// Creates a new `ActionReader` from any `Read` source (e.g., File, Stdin).
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Returns an iterator that lazily reads and deserializes actions.
    pub fn actions(self) -> impl Iterator<Item = Result<ActionRecord>> {
        self.reader
            .into_deserialize()
            .map(|result| result.map_err(RealtimeError::from))
    }
}
