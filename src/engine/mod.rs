use std::fmt;

use log::{debug, warn};
use thiserror::Error;

use crate::{
    sql::{CreateTable, InsertInto, Select, Statement},
    store::{Store, StoreError},
};

/// Outcome of a successfully executed statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryResult {
    Empty,
    RowSet {
        column_names: Vec<String>,
        rows: Vec<Vec<String>>,
    },
}

#[derive(Error, Debug, PartialEq)]
pub enum EngineError {
    #[error("EngineError - table '{0}' not found")]
    TableNotFound(String),
    #[error("EngineError - table '{0}' has no header")]
    MissingHeader(String),
    #[error("EngineError - invalid table name '{0}'")]
    InvalidTableName(String),
    #[error("EngineError - I/O Error: {0}")]
    IoError(String),
    #[error("EngineError - malformed record: {0}")]
    MalformedRecord(String),
}

impl From<StoreError> for EngineError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::TableNotFound(table) => EngineError::TableNotFound(table),
            StoreError::InvalidTableName(table) => EngineError::InvalidTableName(table),
            StoreError::IoError(message) => EngineError::IoError(message),
            StoreError::MalformedRecord(message) => EngineError::MalformedRecord(message),
        }
    }
}

/// Runs statements against a table store. There is no locking: callers
/// must not run two engines against the same tables at the same time.
pub struct Engine<S: Store> {
    store: S,
}

impl<S: Store> Engine<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn execute(&self, statement: &Statement) -> Result<QueryResult, EngineError> {
        debug!("Executing statement on table '{}'", statement.table_name());
        match statement {
            Statement::CreateTable(create) => {
                self.create_table(create)?;
                Ok(QueryResult::Empty)
            }
            Statement::InsertInto(insert) => {
                self.insert_into(insert)?;
                Ok(QueryResult::Empty)
            }
            Statement::Select(select) => self.select(select),
        }
    }

    pub fn list_tables(&self) -> Result<Vec<String>, EngineError> {
        Ok(self.store.list_tables()?)
    }

    // Re-creating a table drops its rows.
    fn create_table(&self, create: &CreateTable) -> Result<(), EngineError> {
        let columns: Vec<String> = create.columns().iter().map(ToString::to_string).collect();
        debug!("Creating table '{}' ({})", create.name(), columns.join(", "));

        if self.store.table_exists(create.name())? {
            warn!("Table '{}' already exists, its rows are discarded", create.name());
        }
        self.store.create_table(create.name(), &create.column_names())?;
        Ok(())
    }

    // Values are appended in the order given. Column names are not matched
    // against the header and the value count is not checked.
    fn insert_into(&self, insert: &InsertInto) -> Result<(), EngineError> {
        self.store.append_record(insert.table_name(), insert.values())?;
        Ok(())
    }

    fn select(&self, select: &Select) -> Result<QueryResult, EngineError> {
        let table = select.table_name();
        let mut records = self.store.read_records(table)?.into_iter();
        let column_names = records
            .next()
            .ok_or_else(|| EngineError::MissingHeader(table.clone()))?;
        let rows: Vec<Vec<String>> = records.collect();

        debug!("Read {} rows from table '{}'", rows.len(), table);
        Ok(QueryResult::RowSet { column_names, rows })
    }
}

impl fmt::Display for QueryResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryResult::Empty => write!(f, "Executed"),
            QueryResult::RowSet { column_names, rows } => {
                write!(f, "{}", column_names.join("\t"))?;
                for row in rows {
                    write!(f, "\n{}", row.join("\t"))?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;
    use crate::{
        schema::{ColumnDefinition, ColumnType},
        store::{file_store::FileStore, memory_store::MemoryStore},
    };

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn create_users() -> Statement {
        Statement::CreateTable(CreateTable::new("users", vec![
            ColumnDefinition::new("id", ColumnType::Int),
            ColumnDefinition::new("name", ColumnType::Varchar(100)),
        ]))
    }

    fn insert_user(values: &[&str]) -> Statement {
        Statement::InsertInto(InsertInto::new("users", strings(&["id", "name"]), strings(values)))
    }

    fn select_users() -> Statement {
        Statement::Select(Select::new("users"))
    }

    #[test]
    fn should_select_header_of_new_table() {
        let engine = Engine::new(MemoryStore::new());

        assert_eq!(engine.execute(&create_users()).unwrap(), QueryResult::Empty);
        assert_eq!(
            engine.execute(&select_users()).unwrap(),
            QueryResult::RowSet { column_names: strings(&["id", "name"]), rows: vec![] }
        );
    }

    #[test]
    fn should_return_inserted_rows_in_order() {
        let base_dir = tempdir().unwrap();
        let engine = Engine::new(FileStore::new(base_dir.path()));

        engine.execute(&create_users()).unwrap();
        assert_eq!(engine.execute(&insert_user(&["1", "Jane Doe"])).unwrap(), QueryResult::Empty);
        engine.execute(&insert_user(&["2", "John Doe"])).unwrap();

        let QueryResult::RowSet { column_names, rows } = engine.execute(&select_users()).unwrap() else {
            panic!("expected a row set");
        };
        assert_eq!(column_names, strings(&["id", "name"]));
        assert_eq!(rows, vec![strings(&["1", "Jane Doe"]), strings(&["2", "John Doe"])]);
    }

    #[test]
    fn should_store_rows_with_their_own_arity() {
        let engine = Engine::new(MemoryStore::new());

        engine.execute(&create_users()).unwrap();
        engine.execute(&insert_user(&["1"])).unwrap();
        engine.execute(&insert_user(&["2", "x", "extra"])).unwrap();

        let QueryResult::RowSet { column_names, rows } = engine.execute(&select_users()).unwrap() else {
            panic!("expected a row set");
        };
        assert_eq!(column_names.len(), 2);
        assert_eq!(rows[0].len(), 1);
        assert_eq!(rows[1].len(), 3);
    }

    #[test]
    fn should_discard_rows_when_table_is_created_again() {
        let engine = Engine::new(MemoryStore::new());

        engine.execute(&create_users()).unwrap();
        engine.execute(&insert_user(&["1", "Jane Doe"])).unwrap();
        engine.execute(&create_users()).unwrap();

        assert_eq!(
            engine.execute(&select_users()).unwrap(),
            QueryResult::RowSet { column_names: strings(&["id", "name"]), rows: vec![] }
        );
    }

    #[test]
    fn should_report_missing_table() {
        let base_dir = tempdir().unwrap();
        let engine = Engine::new(FileStore::new(base_dir.path()));

        assert_eq!(engine.execute(&select_users()).unwrap_err(), EngineError::TableNotFound("users".to_string()));
        assert_eq!(
            engine.execute(&insert_user(&["1", "a"])).unwrap_err(),
            EngineError::TableNotFound("users".to_string())
        );
    }

    #[test]
    fn should_report_table_without_header() {
        let base_dir = tempdir().unwrap();
        std::fs::write(base_dir.path().join("users.tsv"), "").unwrap();
        let engine = Engine::new(FileStore::new(base_dir.path()));

        assert_eq!(engine.execute(&select_users()).unwrap_err(), EngineError::MissingHeader("users".to_string()));
    }

    #[test]
    fn should_render_results() {
        let rows = QueryResult::RowSet {
            column_names: strings(&["id", "name"]),
            rows: vec![strings(&["1", "Jane Doe"])],
        };
        assert_eq!(QueryResult::Empty.to_string(), "Executed");
        assert_eq!(rows.to_string(), "id\tname\n1\tJane Doe");
    }
}
