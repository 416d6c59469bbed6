use std::{fs::OpenOptions, io::{ErrorKind, Write}, path::{Path, PathBuf}};

use log::debug;

use crate::store::{record, Record, Store, StoreError};

const TABLE_FILE_EXTENSION: &str = "tsv";

/// One `<table>.tsv` file per table under `base_path`.
pub struct FileStore<'a> {
    base_path: &'a Path,
}

impl<'a> FileStore<'a> {
    pub fn new(base_path: &'a Path) -> Self {
        Self { base_path }
    }

    /// Like `new`, creating the directory tree first if needed.
    pub fn open(base_path: &'a Path) -> Result<Self, StoreError> {
        std::fs::create_dir_all(base_path)?;
        Ok(Self::new(base_path))
    }

    pub fn base_path(&self) -> &Path {
        self.base_path
    }

    fn table_path(&self, table: &str) -> Result<PathBuf, StoreError> {
        let invalid = table.is_empty()
            || table.starts_with('.')
            || table.contains(['/', '\\']);
        if invalid {
            return Err(StoreError::InvalidTableName(table.to_string()));
        }
        Ok(self.base_path.join(format!("{}.{}", table, TABLE_FILE_EXTENSION)))
    }
}

fn not_found_as_missing_table(table: &str) -> impl FnOnce(std::io::Error) -> StoreError + '_ {
    move |err| match err.kind() {
        ErrorKind::NotFound => StoreError::TableNotFound(table.to_string()),
        _ => err.into(),
    }
}

impl<'a> Store for FileStore<'a> {
    fn create_table(&self, table: &str, header: &[String]) -> Result<(), StoreError> {
        let path = self.table_path(table)?;
        debug!("Writing header of table '{}' to {}", table, path.display());

        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&path)?;
        file.write_all(record::encode_record(header).as_bytes())?;

        Ok(())
    }

    fn append_record(&self, table: &str, fields: &[String]) -> Result<(), StoreError> {
        let path = self.table_path(table)?;
        debug!("Appending record to table '{}' in {}", table, path.display());

        let mut file = OpenOptions::new()
            .append(true)
            .open(&path)
            .map_err(not_found_as_missing_table(table))?;
        file.write_all(record::encode_record(fields).as_bytes())?;

        Ok(())
    }

    fn read_records(&self, table: &str) -> Result<Vec<Record>, StoreError> {
        let path = self.table_path(table)?;
        debug!("Reading table '{}' from {}", table, path.display());

        let content = std::fs::read_to_string(&path).map_err(not_found_as_missing_table(table))?;
        record::decode_records(&content)
    }

    fn table_exists(&self, table: &str) -> Result<bool, StoreError> {
        Ok(self.table_path(table)?.try_exists()?)
    }

    fn list_tables(&self) -> Result<Vec<String>, StoreError> {
        let mut tables = Vec::new();
        for entry in std::fs::read_dir(self.base_path)? {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == TABLE_FILE_EXTENSION) {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    tables.push(stem.to_string());
                }
            }
        }
        tables.sort();
        Ok(tables)
    }
}
