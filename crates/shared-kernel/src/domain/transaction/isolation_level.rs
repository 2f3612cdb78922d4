// crates/shared-kernel/src/domain/transaction/isolation_level.rs

/// Niveau d'isolation demandé au début d'une transaction.
///
/// Les ticks qui lisent puis écrivent sur une fenêtre calculée (publisher outbox)
/// demandent au moins `RepeatableRead` pour éviter les lectures fantômes entre
/// le SELECT verrouillant et l'UPDATE.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IsolationLevel {
    #[default]
    ReadCommitted,
    RepeatableRead,
    Serializable,
}

impl IsolationLevel {
    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::ReadCommitted => "READ COMMITTED",
            Self::RepeatableRead => "REPEATABLE READ",
            Self::Serializable => "SERIALIZABLE",
        }
    }
}
