use deadpool_diesel::postgres::Pool;
use diesel::{PgConnection, QueryResult};

use crate::errors::DatabaseError;

/// Runs diesel queries on pooled connections, tagging failures with the operation name.
pub trait VaultwatchPool {
    fn interact_with_context<F, T>(
        &self,
        operation: String,
        f: F,
    ) -> impl std::future::Future<Output = Result<T, DatabaseError>> + Send
    where
        F: FnOnce(&mut PgConnection) -> QueryResult<T> + Send + 'static,
        T: Send + 'static;
}

impl VaultwatchPool for Pool {
    async fn interact_with_context<F, T>(&self, operation: String, f: F) -> Result<T, DatabaseError>
    where
        F: FnOnce(&mut PgConnection) -> QueryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = self.get().await.map_err(|e| {
            tracing::error!(operation = %operation, error = %e, "No database connection available");
            DatabaseError::unavailable(&operation, e)
        })?;

        let result = conn.interact(f).await.map_err(|e| {
            tracing::error!(operation = %operation, error = %e, "Database interaction aborted");
            DatabaseError::unavailable(&operation, e)
        })?;

        result.map_err(|e| {
            let err = DatabaseError::from_diesel(&operation, e);
            // callers decide whether a missing row matters
            if !err.is_not_found() {
                tracing::error!(error = %err, "Database query failed");
            }
            err
        })
    }
}
