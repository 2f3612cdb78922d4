mod notification;
mod notification_kind;

pub use notification::Notification;
pub use notification_kind::NotificationKind;
