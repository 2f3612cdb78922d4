// crates/shared-kernel/src/domain/transaction/transaction_manager.rs

use futures_util::future::BoxFuture;
use crate::domain::transaction::{IsolationLevel, Transaction};
use crate::errors::{internal_err, Result};

/// Unité de travail exécutée dans une transaction.
/// Le futur emprunte la transaction : tout ce qu'il capture doit être possédé (Arc, clones).
pub type TransactionWork<'a> = Box<
    dyn for<'t> FnOnce(&'t mut dyn Transaction) -> BoxFuture<'t, Result<()>> + Send + 'a,
>;

pub trait TransactionManager: Send + Sync {
    /// Ouvre une transaction, exécute `work`, commit si Ok, rollback sinon.
    fn in_transaction<'a>(
        &'a self,
        isolation: IsolationLevel,
        work: TransactionWork<'a>,
    ) -> BoxFuture<'a, Result<()>>;
}

/// Force l'inférence "higher-ranked" de la closure avant de la boxer.
pub fn boxed_work<'a, F>(work: F) -> TransactionWork<'a>
where
    F: for<'t> FnOnce(&'t mut dyn Transaction) -> BoxFuture<'t, Result<()>> + Send + 'a,
{
    Box::new(work)
}

pub trait TransactionManagerExt: TransactionManager {
    /// Variante typée : la valeur produite par `work` n'est rendue qu'après le commit.
    fn run_in_transaction<'a, T, F>(
        &'a self,
        isolation: IsolationLevel,
        work: F,
    ) -> BoxFuture<'a, Result<T>>
    where
        T: Send + 'static,
        F: for<'t> FnOnce(&'t mut dyn Transaction) -> BoxFuture<'t, Result<T>> + Send + 'static,
    {
        Box::pin(async move {
            let (sender, receiver) = tokio::sync::oneshot::channel();

            self.in_transaction(
                isolation,
                boxed_work(move |tx| {
                    Box::pin(async move {
                        let value = work(tx).await?;
                        // Le receiver vit jusqu'après le commit, l'envoi ne peut pas échouer ici
                        let _ = sender.send(value);
                        Ok(())
                    })
                }),
            )
            .await?;

            receiver
                .await
                .map_err(|_| internal_err("Transaction committed without producing a value"))
        })
    }
}

impl<T: TransactionManager + ?Sized> TransactionManagerExt for T {}
