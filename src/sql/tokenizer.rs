use std::{iter::Peekable, str::Chars, vec::IntoIter};

use thiserror::Error;

use crate::sql::token::{GroupKind, TokenKind, TokenTree};

const DML_WORDS: &[&str] = &["SELECT", "INSERT", "UPDATE", "DELETE"];
const DDL_WORDS: &[&str] = &["CREATE", "DROP", "ALTER", "TRUNCATE"];
const KEYWORDS: &[&str] = &[
    "TABLE", "TABLES", "INTO", "VALUES", "FROM", "WHERE", "AND", "OR", "NOT", "NULL", "AS",
    "ORDER", "GROUP", "BY", "JOIN", "ON", "SET", "LIMIT", "SHOW", "INDEX", "DISTINCT",
];

#[derive(Error, Debug, PartialEq)]
pub enum TokenizeError {
    #[error("TokenizeError - unexpected character '{0}'")]
    UnexpectedCharacter(char),
    #[error("TokenizeError - unterminated string literal")]
    UnterminatedString,
    #[error("TokenizeError - unbalanced parenthesis")]
    UnbalancedParenthesis,
}

/// Lexed but not yet grouped leaves of one `;`-terminated statement.
#[derive(Debug, Clone)]
pub struct StatementTokens {
    leaves: Vec<TokenTree>,
}

impl StatementTokens {
    /// Source text of the statement, terminator included.
    pub fn text(&self) -> String {
        self.leaves.iter().map(TokenTree::text).collect()
    }

    /// Builds the `Statement` group. Fails on unbalanced parentheses.
    pub fn group(self) -> Result<TokenTree, TokenizeError> {
        let grouped = group_parentheses(&mut self.leaves.into_iter(), false)?;
        let grouped = group_identifiers(grouped);
        let grouped = group_functions(grouped);
        let grouped = group_values(grouped);
        Ok(TokenTree::group(GroupKind::Statement, grouped))
    }
}

/// Lexes `input` and cuts it at every `;`. Statements holding nothing but
/// whitespace are dropped. Only lexing errors fail here: a broken string
/// literal makes the statement boundaries unknowable.
pub fn split_statements(input: &str) -> Result<Vec<StatementTokens>, TokenizeError> {
    let leaves = lex(input)?;

    let mut statements = Vec::new();
    let mut current = Vec::new();
    for leaf in leaves {
        let terminates = leaf.is_punctuation(";");
        current.push(leaf);
        if terminates {
            push_statement(&mut statements, std::mem::take(&mut current));
        }
    }
    push_statement(&mut statements, current);

    Ok(statements)
}

/// One `Statement` group per statement of `input`. Grouping errors are
/// reported per statement so that one broken statement leaves the others
/// usable.
pub fn tokenize(input: &str) -> Result<Vec<Result<TokenTree, TokenizeError>>, TokenizeError> {
    Ok(split_statements(input)?
        .into_iter()
        .map(StatementTokens::group)
        .collect())
}

fn push_statement(statements: &mut Vec<StatementTokens>, leaves: Vec<TokenTree>) {
    let empty = leaves
        .iter()
        .all(|t| t.is_whitespace() || t.is_punctuation(";"));
    if !empty {
        statements.push(StatementTokens { leaves });
    }
}

fn lex(input: &str) -> Result<Vec<TokenTree>, TokenizeError> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '(' | ')' | ',' | ';' | '.' => tokens.push(TokenTree::leaf(TokenKind::Punctuation, &c.to_string())),
            '*' => tokens.push(TokenTree::leaf(TokenKind::Wildcard, "*")),
            '\'' => tokens.push(lex_string(&mut chars)?),
            c if c.is_whitespace() => {
                let mut text = c.to_string();
                while let Some(cc) = chars.next_if(|cc| cc.is_whitespace()) {
                    text.push(cc);
                }
                tokens.push(TokenTree::Leaf { kind: TokenKind::Whitespace, text });
            }
            c if c.is_ascii_digit() => tokens.push(lex_number(c, &mut chars)),
            '-' if chars.peek().is_some_and(|cc| cc.is_ascii_digit()) => tokens.push(lex_number(c, &mut chars)),
            c if c.is_alphabetic() || c == '_' => {
                let mut word = c.to_string();
                while let Some(cc) = chars.next_if(|&cc| cc.is_alphanumeric() || cc == '_') {
                    word.push(cc);
                }
                tokens.push(TokenTree::Leaf { kind: classify_word(&word), text: word });
            }
            '=' | '<' | '>' | '!' | '+' | '-' | '/' | '%' => {
                let mut op = c.to_string();
                if let Some(cc) = chars.next_if(|&cc| cc == '=' || (c == '<' && cc == '>')) {
                    op.push(cc);
                }
                tokens.push(TokenTree::Leaf { kind: TokenKind::Operator, text: op });
            }
            _ => return Err(TokenizeError::UnexpectedCharacter(c)),
        }
    }

    Ok(tokens)
}

fn classify_word(word: &str) -> TokenKind {
    let upper = word.to_ascii_uppercase();
    if DML_WORDS.contains(&upper.as_str()) {
        TokenKind::Dml
    } else if DDL_WORDS.contains(&upper.as_str()) {
        TokenKind::Ddl
    } else if KEYWORDS.contains(&upper.as_str()) {
        TokenKind::Keyword
    } else {
        TokenKind::Name
    }
}

// The opening quote is already consumed. Doubled quotes stay in the text.
fn lex_string(chars: &mut Peekable<Chars>) -> Result<TokenTree, TokenizeError> {
    let mut text = String::from("'");
    loop {
        match chars.next() {
            Some('\'') => {
                text.push('\'');
                if chars.next_if_eq(&'\'').is_some() {
                    text.push('\'');
                } else {
                    return Ok(TokenTree::Leaf { kind: TokenKind::String, text });
                }
            }
            Some(c) => text.push(c),
            None => return Err(TokenizeError::UnterminatedString),
        }
    }
}

fn lex_number(first: char, chars: &mut Peekable<Chars>) -> TokenTree {
    let mut text = first.to_string();
    while let Some(c) = chars.next_if(|c| c.is_ascii_digit()) {
        text.push(c);
    }

    let mut kind = TokenKind::Integer;
    if chars.peek() == Some(&'.') {
        let mut lookahead = chars.clone();
        lookahead.next();
        if lookahead.peek().is_some_and(|c| c.is_ascii_digit()) {
            chars.next();
            text.push('.');
            while let Some(c) = chars.next_if(|c| c.is_ascii_digit()) {
                text.push(c);
            }
            kind = TokenKind::Float;
        }
    }

    TokenTree::Leaf { kind, text }
}

fn group_parentheses(leaves: &mut IntoIter<TokenTree>, nested: bool) -> Result<Vec<TokenTree>, TokenizeError> {
    let mut level = Vec::new();

    while let Some(leaf) = leaves.next() {
        if leaf.is_punctuation("(") {
            let mut children = vec![leaf];
            children.extend(group_parentheses(leaves, true)?);
            level.push(TokenTree::group(GroupKind::Parenthesis, children));
        } else if leaf.is_punctuation(")") {
            if !nested {
                return Err(TokenizeError::UnbalancedParenthesis);
            }
            level.push(leaf);
            return Ok(level);
        } else {
            level.push(leaf);
        }
    }

    if nested {
        return Err(TokenizeError::UnbalancedParenthesis);
    }
    Ok(level)
}

fn group_identifiers(level: Vec<TokenTree>) -> Vec<TokenTree> {
    let mut grouped: Vec<TokenTree> = Vec::with_capacity(level.len());
    let mut tokens = level.into_iter().peekable();

    while let Some(token) = tokens.next() {
        let token = recurse(token, group_identifiers);
        if !token.is_leaf(TokenKind::Name) {
            grouped.push(token);
            continue;
        }

        let mut parts = vec![token];
        while tokens.peek().is_some_and(|t| t.is_punctuation(".")) {
            let dot = tokens.next();
            match tokens.next_if(|t| t.is_leaf(TokenKind::Name)) {
                Some(name) => parts.extend(dot.into_iter().chain(Some(name))),
                None => {
                    parts.extend(dot);
                    break;
                }
            }
        }

        if parts.len() == 1 {
            grouped.extend(parts);
        } else {
            grouped.push(TokenTree::group(GroupKind::Identifier, parts));
        }
    }

    grouped
}

// A name directly followed (whitespace allowed) by a parenthesis becomes a
// function group, except on a CREATE TABLE level where the table name and
// the column list have to stay siblings.
fn group_functions(level: Vec<TokenTree>) -> Vec<TokenTree> {
    let level: Vec<TokenTree> = level.into_iter().map(|t| recurse(t, group_functions)).collect();

    let creates_table = level.iter().any(|t| t.is_keyword("CREATE")) && level.iter().any(|t| t.is_keyword("TABLE"));
    if creates_table {
        return level;
    }

    let mut grouped = Vec::with_capacity(level.len());
    let mut tokens = level.into_iter().peekable();
    while let Some(token) = tokens.next() {
        if !(token.is_leaf(TokenKind::Name) || token.is_group(GroupKind::Identifier)) {
            grouped.push(token);
            continue;
        }

        let whitespace = tokens.next_if(TokenTree::is_whitespace);
        match tokens.next_if(|t| t.is_group(GroupKind::Parenthesis)) {
            Some(parenthesis) => {
                let mut children = vec![token];
                children.extend(whitespace);
                children.push(parenthesis);
                grouped.push(TokenTree::group(GroupKind::Function, children));
            }
            None => {
                grouped.push(token);
                grouped.extend(whitespace);
            }
        }
    }

    grouped
}

// VALUES (..)[, (..)]* on the statement level.
fn group_values(level: Vec<TokenTree>) -> Vec<TokenTree> {
    let mut grouped = Vec::with_capacity(level.len());
    let mut tokens = level.into_iter().peekable();

    while let Some(token) = tokens.next() {
        if !token.is_keyword("VALUES") {
            grouped.push(token);
            continue;
        }

        let mut children = vec![token];
        let mut pending = Vec::new();
        while let Some(next) = tokens.peek() {
            if next.is_whitespace() || next.is_punctuation(",") {
                pending.extend(tokens.next());
            } else if next.is_group(GroupKind::Parenthesis) {
                children.append(&mut pending);
                children.extend(tokens.next());
            } else {
                break;
            }
        }

        grouped.push(TokenTree::group(GroupKind::Values, children));
        grouped.append(&mut pending);
    }

    grouped
}

fn recurse(token: TokenTree, pass: fn(Vec<TokenTree>) -> Vec<TokenTree>) -> TokenTree {
    match token {
        TokenTree::Group { kind, children } => TokenTree::Group { kind, children: pass(children) },
        leaf => leaf,
    }
}
