mod notification_row;

pub use notification_row::NotificationRow;
