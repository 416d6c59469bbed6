pub mod parser;
pub mod statement;
pub mod token;
pub mod tokenizer;

pub use parser::{parse, parse_all, parse_tree, ParseError, ParsedStatement};
pub use statement::{CreateTable, InsertInto, Select, Statement};
