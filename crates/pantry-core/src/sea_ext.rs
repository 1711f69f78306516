use sea_orm::{DbErr, SqlErr, TransactionError};

/// Classification of constraint failures reported by the database.
///
/// Uniqueness constraints are the source of truth for "already exists"
/// decisions; callers translate these into domain conflicts instead of
/// trusting a prior existence check.
pub trait DbErrExt {
    fn is_unique_violation(&self) -> bool;
    fn is_foreign_key_violation(&self) -> bool;
}

impl DbErrExt for DbErr {
    fn is_unique_violation(&self) -> bool {
        matches!(self.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
    }

    fn is_foreign_key_violation(&self) -> bool {
        matches!(
            self.sql_err(),
            Some(SqlErr::ForeignKeyConstraintViolation(_))
        )
    }
}

/// Unwrap a transaction error into the inner database error.
pub fn flatten_transaction_err(err: TransactionError<DbErr>) -> DbErr {
    match err {
        TransactionError::Connection(e) | TransactionError::Transaction(e) => e,
    }
}
