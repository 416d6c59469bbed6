use std::{cell::RefCell, collections::BTreeMap};

use crate::store::{Record, Store, StoreError};

/// Keeps tables in process memory. Same semantics as the file store,
/// minus persistence.
#[derive(Default)]
pub struct MemoryStore {
    tables: RefCell<BTreeMap<String, Vec<Record>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Store for MemoryStore {
    fn create_table(&self, table: &str, header: &[String]) -> Result<(), StoreError> {
        self.tables
            .borrow_mut()
            .insert(table.to_string(), vec![header.to_vec()]);
        Ok(())
    }

    fn append_record(&self, table: &str, record: &[String]) -> Result<(), StoreError> {
        let mut tables = self.tables.borrow_mut();
        let records = tables
            .get_mut(table)
            .ok_or_else(|| StoreError::TableNotFound(table.to_string()))?;
        records.push(record.to_vec());
        Ok(())
    }

    fn read_records(&self, table: &str) -> Result<Vec<Record>, StoreError> {
        self.tables
            .borrow()
            .get(table)
            .cloned()
            .ok_or_else(|| StoreError::TableNotFound(table.to_string()))
    }

    fn table_exists(&self, table: &str) -> Result<bool, StoreError> {
        Ok(self.tables.borrow().contains_key(table))
    }

    fn list_tables(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.tables.borrow().keys().cloned().collect())
    }
}
