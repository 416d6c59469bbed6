use std::fmt;

use derive_getters::Getters;

/// Declared type of a column. Only used at parse time: the store keeps
/// every value as text and never checks it against the declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Int,
    Varchar(u16),
}

#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct ColumnDefinition {
    name: String,
    col_type: ColumnType,
}

impl ColumnDefinition {
    pub fn new(name: &str, col_type: ColumnType) -> Self {
        Self {
            name: name.to_string(),
            col_type,
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnType::Int => write!(f, "INT"),
            ColumnType::Varchar(len) => write!(f, "VARCHAR({})", len),
        }
    }
}

impl fmt::Display for ColumnDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.col_type)
    }
}
