// crates/shared-kernel/src/infrastructure/postgres/mappers/postgres_error_mapper.rs

use crate::errors::DomainError;
use sqlx::postgres::PgDatabaseError;

pub trait SqlxErrorExt<T> {
    /// Traduit les codes Postgres connus en erreurs métier pour l'entité `entity`.
    fn map_domain(self, entity: &'static str) -> Result<T, DomainError>;
    fn map_domain_infra(self, context: &'static str) -> Result<T, DomainError>;
}

impl<T> SqlxErrorExt<T> for std::result::Result<T, sqlx::Error> {
    fn map_domain(self, entity: &'static str) -> Result<T, DomainError> {
        self.map_err(|e| match e {
            sqlx::Error::RowNotFound => DomainError::NotFound {
                entity,
                id: "unknown".into(),
            },
            sqlx::Error::Database(db_err) => {
                // Violation d'unicité (23505)
                if db_err.code().map(|c| c == "23505").unwrap_or(false) {
                    let field = db_err
                        .try_downcast_ref::<PgDatabaseError>()
                        .and_then(|pg| pg.constraint())
                        .map(constraint_to_field)
                        .unwrap_or("unique_constraint");

                    return DomainError::AlreadyExists {
                        entity,
                        field,
                        value: "already taken".into(),
                    };
                }

                // Échec de sérialisation (40001)
                if db_err.code().map(|c| c == "40001").unwrap_or(false) {
                    return DomainError::ConcurrencyConflict {
                        reason: format!("Concurrency conflict on {}", entity),
                    };
                }

                DomainError::Infrastructure(db_err.message().into())
            }
            _ => DomainError::Infrastructure(e.to_string()),
        })
    }

    fn map_domain_infra(self, context: &'static str) -> Result<T, DomainError> {
        self.map_err(|e| DomainError::Infrastructure(format!("{}: {}", context, e)))
    }
}

fn constraint_to_field(constraint: &str) -> &'static str {
    match constraint {
        "outbox_events_pkey" | "inbox_messages_pkey" => "id",
        c if c.contains("source_event_id") => "source_event_id",
        _ => "unique_constraint",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primary_keys_map_to_id() {
        assert_eq!(constraint_to_field("outbox_events_pkey"), "id");
        assert_eq!(constraint_to_field("inbox_messages_pkey"), "id");
        assert_eq!(constraint_to_field("something_else"), "unique_constraint");
    }

    #[test]
    fn row_not_found_maps_to_not_found() {
        let result: std::result::Result<(), sqlx::Error> = Err(sqlx::Error::RowNotFound);
        let err = result.map_domain("inbox_message").unwrap_err();

        assert!(matches!(err, DomainError::NotFound { entity: "inbox_message", .. }));
    }
}
