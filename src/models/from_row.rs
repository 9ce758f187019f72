use rusqlite::Row;

pub trait FromSqliteRow: Sized {
    fn from_row(row: &Row) -> rusqlite::Result<Self>;
}

/// Builds the error rusqlite expects when a stored text column holds a value
/// outside its enum.
pub(crate) fn invalid_column(index: usize, value: &str) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(
        index,
        rusqlite::types::Type::Text,
        format!("unexpected value: {}", value).into(),
    )
}
