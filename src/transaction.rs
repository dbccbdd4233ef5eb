use std::future::Future;
use std::pin::Pin;

use libsql::Connection;
use tracing::warn;

use crate::Db;

/// Failures of the transaction bracket itself, as opposed to the work inside it
#[derive(Debug)]
pub enum TransactionError {
    Begin,
    Commit,
}

/// Run `f` inside `BEGIN`/`COMMIT` while holding the write lock.
///
/// Any error returned by `f` rolls the transaction back and is handed to the
/// caller unchanged. The closure returns a boxed future so it can borrow the
/// connection for the duration of the call.
pub async fn with_transaction<F, T, E>(db: &Db, f: F) -> Result<T, E>
where
    F: for<'a> FnOnce(&'a Connection) -> Pin<Box<dyn Future<Output = Result<T, E>> + Send + 'a>>,
    E: From<TransactionError>,
{
    let conn = db.write().await;

    conn.execute("BEGIN TRANSACTION", ())
        .await
        .map_err(|_| TransactionError::Begin)?;

    match f(&conn).await {
        Ok(result) => {
            conn.execute("COMMIT", ())
                .await
                .map_err(|_| TransactionError::Commit)?;
            Ok(result)
        }
        Err(e) => {
            if let Err(rollback_error) = conn.execute("ROLLBACK", ()).await {
                warn!(error = %rollback_error, "failed to roll back transaction");
            }
            Err(e)
        }
    }
}
