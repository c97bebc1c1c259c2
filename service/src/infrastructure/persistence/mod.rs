use sqlx::PgPool;
use vernissage_common::database::Database;

use crate::domain::repository::RepositoryError;

mod content;
#[cfg(test)]
pub mod memory;
mod outbox;
mod rows;
mod submissions;
mod users;

/// Postgres implementation of every repository port
#[derive(Clone, Debug)]
pub struct PostgresRepository {
    database: &'static Database,
}

impl PostgresRepository {
    pub fn new(database: &'static Database) -> Self {
        Self { database }
    }

    fn pool(&self) -> &PgPool {
        self.database.database_pool()
    }
}

impl From<sqlx::Error> for RepositoryError {
    fn from(value: sqlx::Error) -> Self {
        match value {
            sqlx::Error::RowNotFound => RepositoryError::NotFound,
            sqlx::Error::Database(err) if err.is_unique_violation() => {
                RepositoryError::UniqueViolation(err.constraint().unwrap_or_default().to_string())
            }
            other => RepositoryError::DatabaseError(other.to_string()),
        }
    }
}
