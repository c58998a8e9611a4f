//! Domain records shared between the store and the HTTP surface

use serde::{Deserialize, Serialize};

/// A transfer recorded against a watched address.
///
/// All fields are kept as the strings the node reports; `amount` is not
/// parsed into a numeric type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(rename = "from")]
    pub sender: String,
    #[serde(rename = "to")]
    pub receiver: String,
    #[serde(rename = "value")]
    pub amount: String,
    #[serde(rename = "hash")]
    pub tx_hash: String,
}

impl Transaction {
    pub fn new(
        sender: impl Into<String>,
        receiver: impl Into<String>,
        amount: impl Into<String>,
        tx_hash: impl Into<String>,
    ) -> Self {
        Self {
            sender: sender.into(),
            receiver: receiver.into(),
            amount: amount.into(),
            tx_hash: tx_hash.into(),
        }
    }
}
