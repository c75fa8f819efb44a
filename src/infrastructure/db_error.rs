use sea_orm::{DbErr, SqlErr};

use crate::domain::error::RepositoryError;

pub fn map_db_err(err: DbErr) -> RepositoryError {
    if let Some(SqlErr::UniqueConstraintViolation(msg)) = err.sql_err() {
        return RepositoryError::Duplicate(msg);
    }

    match err {
        DbErr::ConnectionAcquire(e) => RepositoryError::Unavailable(e.to_string()),
        DbErr::Conn(e) => RepositoryError::Unavailable(e.to_string()),
        DbErr::RecordNotFound(_) | DbErr::RecordNotUpdated => RepositoryError::NotFound,
        other => RepositoryError::DatabaseError(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_not_updated_is_not_found() {
        assert!(matches!(map_db_err(DbErr::RecordNotUpdated), RepositoryError::NotFound));
    }

    #[test]
    fn other_errors_keep_their_message() {
        let err = map_db_err(DbErr::Custom("boom".to_string()));
        assert!(matches!(err, RepositoryError::DatabaseError(msg) if msg.contains("boom")));
    }
}
