// crates/notifications/src/domain/entities/notification_kind.rs

use std::fmt;
use std::str::FromStr;
use serde::{Deserialize, Serialize};
use shared_kernel::errors::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    FriendRequestReceived,
    FriendRequestAccepted,
    FriendRequestDeclined,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FriendRequestReceived => "friend_request_received",
            Self::FriendRequestAccepted => "friend_request_accepted",
            Self::FriendRequestDeclined => "friend_request_declined",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NotificationKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "friend_request_received" => Ok(Self::FriendRequestReceived),
            "friend_request_accepted" => Ok(Self::FriendRequestAccepted),
            "friend_request_declined" => Ok(Self::FriendRequestDeclined),
            other => Err(DomainError::Validation {
                field: "kind",
                reason: format!("Unknown notification kind '{other}'"),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_round_trips_through_its_column_value() {
        for kind in [
            NotificationKind::FriendRequestReceived,
            NotificationKind::FriendRequestAccepted,
            NotificationKind::FriendRequestDeclined,
        ] {
            assert_eq!(kind.as_str().parse::<NotificationKind>().unwrap(), kind);
        }
    }

    #[test]
    fn unknown_kind_is_rejected() {
        let err = "friend_request_cancelled".parse::<NotificationKind>().unwrap_err();
        assert!(matches!(err, DomainError::Validation { field: "kind", .. }));
    }
}
