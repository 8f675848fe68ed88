use crate::errors::AppError;
use deadpool_diesel::postgres::Pool;
use diesel::PgConnection;
use tracing::{debug, error};

/// Runs synchronous diesel work on a pooled connection.
pub(super) async fn run_query<T, F>(pool: &Pool, query: F) -> Result<T, AppError>
where
    F: FnOnce(&mut PgConnection) -> Result<T, AppError> + Send + 'static,
    T: Send + 'static,
{
    let conn = pool.get().await.map_err(|pool_err| {
        error!(
            "Failed to get DB connection object from pool: {:?}",
            pool_err
        );
        AppError::from(pool_err)
    })?;
    debug!("DB connection object obtained from pool for interaction");

    match conn.interact(query).await {
        Ok(result) => result,
        Err(interact_err) => {
            error!("Deadpool interact error: {:?}", interact_err);
            Err(AppError::from(interact_err))
        }
    }
}
