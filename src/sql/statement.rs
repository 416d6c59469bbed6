use derive_getters::Getters;

use crate::schema::ColumnDefinition;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    CreateTable(CreateTable),
    InsertInto(InsertInto),
    Select(Select),
}

#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct CreateTable {
    name: String,
    columns: Vec<ColumnDefinition>,
}

/// Column names and values are kept as written. Nothing checks that
/// both lists have the same length or that they match the table header.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct InsertInto {
    table_name: String,
    column_names: Vec<String>,
    values: Vec<String>,
}

/// `SELECT * FROM <table_name>`
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct Select {
    table_name: String,
}

impl CreateTable {
    pub fn new(name: &str, columns: Vec<ColumnDefinition>) -> Self {
        Self {
            name: name.to_string(),
            columns,
        }
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name().clone()).collect()
    }
}

impl InsertInto {
    pub fn new(table_name: &str, column_names: Vec<String>, values: Vec<String>) -> Self {
        Self {
            table_name: table_name.to_string(),
            column_names,
            values,
        }
    }
}

impl Select {
    pub fn new(table_name: &str) -> Self {
        Self {
            table_name: table_name.to_string(),
        }
    }
}

impl Statement {
    pub fn table_name(&self) -> &str {
        match self {
            Statement::CreateTable(create) => create.name().as_str(),
            Statement::InsertInto(insert) => insert.table_name().as_str(),
            Statement::Select(select) => select.table_name().as_str(),
        }
    }
}
