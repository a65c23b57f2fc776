use sqlx::{MySql, Pool};

/// Anything that can hand out the database pool. Repositories and usecases are
/// generic over this so callers can pass their own request or job context.
pub trait Context: Sync + Send {
    fn db(&self) -> &Pool<MySql>;
}
