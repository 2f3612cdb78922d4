// crates/shared-kernel/src/infrastructure/postgres/transactions/postgres_transaction_manager.rs

use futures_util::future::BoxFuture;
use sqlx::{Pool, Postgres};
use crate::domain::transaction::{IsolationLevel, TransactionManager, TransactionWork};
use crate::errors::Result;
use crate::infrastructure::postgres::mappers::SqlxErrorExt;
use crate::infrastructure::postgres::transactions::PostgresTransaction;

#[derive(Clone)]
pub struct PostgresTransactionManager {
    pool: Pool<Postgres>,
}

impl PostgresTransactionManager {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

impl TransactionManager for PostgresTransactionManager {
    fn in_transaction<'a>(
        &'a self,
        isolation: IsolationLevel,
        work: TransactionWork<'a>,
    ) -> BoxFuture<'a, Result<()>> {
        Box::pin(async move {
            let mut tx = self
                .pool
                .begin()
                .await
                .map_domain_infra("Failed to begin transaction")?;

            // Doit être la première instruction de la transaction
            sqlx::query(&format!("SET TRANSACTION ISOLATION LEVEL {}", isolation.as_sql()))
                .execute(&mut *tx)
                .await
                .map_domain_infra("Failed to set isolation level")?;

            let mut wrapper = PostgresTransaction::new(tx);
            let outcome = work(&mut wrapper).await;
            let tx = wrapper.into_inner();

            match outcome {
                Ok(()) => tx.commit().await.map_domain("transaction"),
                Err(e) => {
                    if let Err(rollback_err) = tx.rollback().await {
                        tracing::warn!(error = %rollback_err, "Rollback failed");
                    }
                    Err(e)
                }
            }
        })
    }
}
