mod notification_repository;
mod notification_repository_stub;

pub use notification_repository::NotificationRepository;
pub use notification_repository_stub::NotificationRepositoryStub;
