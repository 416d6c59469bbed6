use log::debug;
use thiserror::Error;

use crate::{
    schema::{ColumnDefinition, ColumnType},
    sql::{
        statement::{CreateTable, InsertInto, Select, Statement},
        token::{GroupKind, TokenKind, TokenTree},
        tokenizer::{self, TokenizeError},
    },
};

#[derive(Error, Debug, PartialEq)]
pub enum ParseError {
    #[error("ParseError - {0}")]
    Tokenize(#[from] TokenizeError),
    #[error("ParseError - no statement found")]
    EmptyStatement,
    #[error("ParseError - unsupported statement: {0}")]
    UnsupportedStatement(String),
    #[error("ParseError - expected keyword {0}")]
    ExpectedKeyword(String),
    #[error("ParseError - expected a table name")]
    ExpectedTableName,
    #[error("ParseError - missing table name")]
    MissingTableName,
    #[error("ParseError - missing column definitions")]
    MissingColumns,
    #[error("ParseError - expected a column name, found '{0}'")]
    ExpectedColumnName(String),
    #[error("ParseError - missing type for column '{0}'")]
    MissingColumnType(String),
    #[error("ParseError - unexpected column type '{0}'")]
    UnexpectedColumnType(String),
    #[error("ParseError - expected VARCHAR, found '{0}'")]
    UnexpectedVarcharToken(String),
    #[error("ParseError - expected a size for VARCHAR")]
    ExpectedVarcharSize,
    #[error("ParseError - invalid VARCHAR size '{0}'")]
    InvalidVarcharSize(String),
    #[error("ParseError - missing INTO clause")]
    MissingIntoClause,
    #[error("ParseError - malformed INSERT: {0}")]
    MalformedInsert(String),
    #[error("ParseError - malformed SELECT: {0}")]
    MalformedSelect(String),
}

/// One statement of a multi-statement input, parsed or not.
#[derive(Debug, PartialEq)]
pub struct ParsedStatement {
    pub source: String,
    pub statement: Result<Statement, ParseError>,
}

/// Parses the first statement found in `input`; any following statement
/// is neither grouped nor parsed.
pub fn parse(input: &str) -> Result<Statement, ParseError> {
    let first = tokenizer::split_statements(input)?
        .into_iter()
        .next()
        .ok_or(ParseError::EmptyStatement)?;
    parse_tree(&first.group()?)
}

/// Parses every statement of `input` in order. Only a lexing failure fails
/// the whole input; any other error stays with its own statement.
pub fn parse_all(input: &str) -> Result<Vec<ParsedStatement>, ParseError> {
    let statements = tokenizer::split_statements(input)?
        .into_iter()
        .map(|tokens| {
            let source = tokens.text().trim().to_string();
            let statement = tokens
                .group()
                .map_err(ParseError::from)
                .and_then(|tree| parse_tree(&tree));
            ParsedStatement { source, statement }
        })
        .collect();

    Ok(statements)
}

/// Builds a statement out of one top-level statement group.
pub fn parse_tree(tree: &TokenTree) -> Result<Statement, ParseError> {
    let mut children = tree.significant_children();
    if children.last().is_some_and(|t| t.is_punctuation(";")) {
        children.pop();
    }

    let statement = match statement_kind(&children).as_str() {
        "CREATE" => Statement::CreateTable(parse_create_table(&children)?),
        "INSERT" => Statement::InsertInto(parse_insert_into(&children)?),
        "SELECT" => Statement::Select(parse_select(&children)?),
        kind => return Err(ParseError::UnsupportedStatement(kind.to_string())),
    };

    debug!("Parsed statement: {:?}", statement);
    Ok(statement)
}

fn statement_kind(children: &[&TokenTree]) -> String {
    match children.first() {
        Some(TokenTree::Leaf { kind: TokenKind::Dml | TokenKind::Ddl, text }) => text.to_ascii_uppercase(),
        _ => "UNKNOWN".to_string(),
    }
}

// CREATE TABLE <name> (<column> <type>, ...)
// Positions 0..=2 are fixed; the first parenthesis anywhere is the column list.
fn parse_create_table(children: &[&TokenTree]) -> Result<CreateTable, ParseError> {
    if !children.get(1).is_some_and(|t| t.is_keyword("TABLE")) {
        return Err(ParseError::ExpectedKeyword("TABLE".to_string()));
    }

    let name = match children.get(2) {
        Some(token) => identifier_name(token).ok_or(ParseError::ExpectedTableName)?,
        None => return Err(ParseError::MissingTableName),
    };

    let column_list = children
        .iter()
        .find(|t| t.is_group(GroupKind::Parenthesis))
        .ok_or(ParseError::MissingColumns)?;

    let columns = parse_column_definitions(column_list)?;
    if columns.is_empty() {
        return Err(ParseError::MissingColumns);
    }

    Ok(CreateTable::new(&name, columns))
}

// Triplets of (name, type, separator). The separator is not checked.
fn parse_column_definitions(column_list: &TokenTree) -> Result<Vec<ColumnDefinition>, ParseError> {
    let mut columns = Vec::new();

    for triplet in strip_parentheses(column_list).chunks(3) {
        let name = column_name(triplet[0])?;
        let col_type = match triplet.get(1) {
            Some(token) => column_type(token)?,
            None => return Err(ParseError::MissingColumnType(name)),
        };
        columns.push(ColumnDefinition::new(&name, col_type));
    }

    Ok(columns)
}

fn column_name(token: &TokenTree) -> Result<String, ParseError> {
    match token {
        TokenTree::Leaf { kind: TokenKind::Name, text } => Ok(text.clone()),
        other => Err(ParseError::ExpectedColumnName(other.text())),
    }
}

fn column_type(token: &TokenTree) -> Result<ColumnType, ParseError> {
    match token {
        TokenTree::Group { kind: GroupKind::Function, .. } => varchar_type(token),
        TokenTree::Leaf { kind: TokenKind::Name, text } if text.eq_ignore_ascii_case("INT") => Ok(ColumnType::Int),
        other => Err(ParseError::UnexpectedColumnType(other.text())),
    }
}

fn varchar_type(function: &TokenTree) -> Result<ColumnType, ParseError> {
    let parts = function.significant_children();

    let keyword = parts.first().map(|t| t.text()).unwrap_or_default();
    if !keyword.eq_ignore_ascii_case("VARCHAR") {
        return Err(ParseError::UnexpectedVarcharToken(keyword));
    }

    let arguments = parts.get(1).map(|t| strip_parentheses(t)).unwrap_or_default();
    match arguments.as_slice() {
        [TokenTree::Leaf { kind: TokenKind::Integer, text }] => match text.parse::<u16>() {
            Ok(size) if size > 0 => Ok(ColumnType::Varchar(size)),
            _ => Err(ParseError::InvalidVarcharSize(text.clone())),
        },
        _ => Err(ParseError::ExpectedVarcharSize),
    }
}

// INSERT INTO <table> (<column>, ...) VALUES (<value>, ...)
fn parse_insert_into(children: &[&TokenTree]) -> Result<InsertInto, ParseError> {
    let into = children
        .iter()
        .position(|t| t.is_keyword("INTO"))
        .ok_or(ParseError::MissingIntoClause)?;

    let target = children
        .get(into + 1)
        .filter(|t| t.is_group(GroupKind::Function))
        .ok_or_else(|| malformed_insert("expected <table> (<columns>) after INTO"))?;

    let (table_name, column_names) = match target.significant_children().as_slice() {
        [table, columns] if columns.is_group(GroupKind::Parenthesis) => {
            let table_name = identifier_name(table).ok_or_else(|| malformed_insert("expected a table name"))?;
            (table_name, identifier_list(columns)?)
        }
        _ => return Err(malformed_insert("expected <table> (<columns>) after INTO")),
    };

    let values_clause = children
        .get(into + 2)
        .filter(|t| t.is_group(GroupKind::Values))
        .ok_or_else(|| malformed_insert("expected VALUES after the column list"))?;

    let values = match values_clause.significant_children().as_slice() {
        [_, list] => literal_list(list)?,
        [_] => return Err(malformed_insert("missing value list")),
        _ => return Err(malformed_insert("only one row of values is supported")),
    };

    if let Some(extra) = children.get(into + 3) {
        return Err(malformed_insert(&format!("unexpected '{}' after VALUES", extra.text())));
    }

    Ok(InsertInto::new(&table_name, column_names, values))
}

fn identifier_list(list: &TokenTree) -> Result<Vec<String>, ParseError> {
    comma_separated(list)?
        .into_iter()
        .map(|t| match t {
            TokenTree::Leaf { kind: TokenKind::Name, text } => Ok(text.clone()),
            other => Err(malformed_insert(&format!("expected a column name, found '{}'", other.text()))),
        })
        .collect()
}

fn literal_list(list: &TokenTree) -> Result<Vec<String>, ParseError> {
    comma_separated(list)?
        .into_iter()
        .map(|t| match t {
            TokenTree::Leaf { kind: TokenKind::String, text } => Ok(unquote(text)),
            TokenTree::Leaf { kind: TokenKind::Integer | TokenKind::Float | TokenKind::Name, text } => Ok(text.clone()),
            other if other.is_keyword("NULL") => Ok(other.text()),
            other => Err(malformed_insert(&format!("expected a literal, found '{}'", other.text()))),
        })
        .collect()
}

// Stride-2 sampling: even positions are items, odd positions must be commas.
fn comma_separated(list: &TokenTree) -> Result<Vec<&TokenTree>, ParseError> {
    if !list.is_group(GroupKind::Parenthesis) {
        return Err(malformed_insert(&format!("expected a parenthesized list, found '{}'", list.text())));
    }

    let elements = strip_parentheses(list);
    if elements.is_empty() {
        return Err(malformed_insert("empty list"));
    }
    if elements.len() % 2 == 0 {
        return Err(malformed_insert(&format!("dangling separator in '{}'", list.text())));
    }

    let mut items = Vec::with_capacity(elements.len() / 2 + 1);
    for (i, element) in elements.into_iter().enumerate() {
        if i % 2 == 0 {
            items.push(element);
        } else if !element.is_punctuation(",") {
            return Err(malformed_insert(&format!("expected ',', found '{}'", element.text())));
        }
    }
    Ok(items)
}

// SELECT * FROM <table>
fn parse_select(children: &[&TokenTree]) -> Result<Select, ParseError> {
    if children.len() < 4 {
        return Err(malformed_select("expected SELECT * FROM <table>"));
    }
    if !children[1].is_leaf(TokenKind::Wildcard) {
        return Err(malformed_select(&format!("expected '*', found '{}'", children[1].text())));
    }
    if !children[2].is_keyword("FROM") {
        return Err(malformed_select(&format!("expected FROM, found '{}'", children[2].text())));
    }

    let table_name = identifier_name(children[3]).ok_or_else(|| malformed_select("expected a table name"))?;
    if let Some(extra) = children.get(4) {
        return Err(malformed_select(&format!("unexpected '{}' after table name", extra.text())));
    }

    Ok(Select::new(&table_name))
}

fn identifier_name(token: &TokenTree) -> Option<String> {
    match token {
        TokenTree::Leaf { kind: TokenKind::Name, text } => Some(text.clone()),
        TokenTree::Group { kind: GroupKind::Identifier, .. } => Some(token.text()),
        _ => None,
    }
}

// Drops the "(" and ")" leaves of a parenthesis and all whitespace.
fn strip_parentheses(group: &TokenTree) -> Vec<&TokenTree> {
    let children = group.children();
    if children.len() < 2 {
        return Vec::new();
    }
    children[1..children.len() - 1]
        .iter()
        .filter(|t| !t.is_whitespace())
        .collect()
}

fn unquote(text: &str) -> String {
    match text.strip_prefix('\'').and_then(|t| t.strip_suffix('\'')) {
        Some(inner) => inner.replace("''", "'"),
        None => text.to_string(),
    }
}

fn malformed_insert(message: &str) -> ParseError {
    ParseError::MalformedInsert(message.to_string())
}

fn malformed_select(message: &str) -> ParseError {
    ParseError::MalformedSelect(message.to_string())
}
