pub mod file_store;
pub mod memory_store;
pub mod record;

use thiserror::Error;

/// One line of a table: the header or a data row, every cell kept as text.
pub type Record = Vec<String>;

/// Persists tables as ordered lists of records, the first one being the
/// header. Implementations are not synchronized: a table must have a
/// single writer and no concurrent reader.
pub trait Store {
    /// Creates the table, replacing any existing one, with `header` as
    /// its only record.
    fn create_table(&self, table: &str, header: &[String]) -> Result<(), StoreError>;
    fn append_record(&self, table: &str, record: &[String]) -> Result<(), StoreError>;
    /// All records of the table in insertion order, header first.
    fn read_records(&self, table: &str) -> Result<Vec<Record>, StoreError>;
    fn table_exists(&self, table: &str) -> Result<bool, StoreError>;
    fn list_tables(&self) -> Result<Vec<String>, StoreError>;
}

#[derive(Error, Debug, PartialEq)]
pub enum StoreError {
    #[error("StoreError - table '{0}' not found")]
    TableNotFound(String),
    #[error("StoreError - invalid table name '{0}'")]
    InvalidTableName(String),
    #[error("StoreError - I/O Error: {0}")]
    IoError(String),
    #[error("StoreError - malformed record: {0}")]
    MalformedRecord(String),
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        StoreError::IoError(err.to_string())
    }
}
