//! Repository layer for database operations

pub mod leave;
pub mod reports;
pub mod session;
pub mod staff;

pub use session::{SqliteSession, StaffStore};

#[cfg(test)]
pub(crate) async fn test_pool() -> sqlx::SqlitePool {
    super::connect(super::MEMORY_DATABASE)
        .await
        .expect("in-memory database")
}
