mod event;

pub use event::DomainEvent;
