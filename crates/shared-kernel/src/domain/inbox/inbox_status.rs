// crates/shared-kernel/src/domain/inbox/inbox_status.rs

use std::fmt;
use std::str::FromStr;
use serde::{Deserialize, Serialize};
use crate::errors::DomainError;

/// Cycle de vie d'un message inbox.
///
/// `Received` -> `Processing` -> `Processed` | `Failed`, et `Failed` repasse en
/// `Processing` tant que le plafond de tentatives n'est pas atteint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InboxStatus {
    Received,
    Processing,
    Failed,
    Processed,
}

impl InboxStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InboxStatus::Received => "received",
            InboxStatus::Processing => "processing",
            InboxStatus::Failed => "failed",
            InboxStatus::Processed => "processed",
        }
    }

    /// Un message `processing` est repris : un worker a pu mourir en plein traitement.
    pub fn is_pending(&self) -> bool {
        !matches!(self, InboxStatus::Processed)
    }
}

impl fmt::Display for InboxStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InboxStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "received" => Ok(InboxStatus::Received),
            "processing" => Ok(InboxStatus::Processing),
            "failed" => Ok(InboxStatus::Failed),
            "processed" => Ok(InboxStatus::Processed),
            other => Err(DomainError::Validation {
                field: "status",
                reason: format!("Unknown inbox status: {}", other),
            }),
        }
    }
}
