pub mod config;
pub mod engine;
pub mod logger;
pub mod schema;
pub mod sql;
pub mod store;

use thiserror::Error;

use crate::{
    engine::{Engine, EngineError, QueryResult},
    sql::ParseError,
    store::Store,
};

#[derive(Error, Debug, PartialEq)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// Result of one statement of a script, along with its source text.
#[derive(Debug)]
pub struct ScriptOutcome {
    pub statement: String,
    pub result: Result<QueryResult, Error>,
}

/// Parses the first statement of `input` and executes it.
pub fn execute_statement<S: Store>(engine: &Engine<S>, input: &str) -> Result<QueryResult, Error> {
    let statement = sql::parse(input)?;
    Ok(engine.execute(&statement)?)
}

/// Executes every statement of `input` in order. A failing statement does
/// not stop the following ones; only a lexing failure aborts the whole
/// script.
pub fn execute_script<S: Store>(engine: &Engine<S>, input: &str) -> Result<Vec<ScriptOutcome>, Error> {
    let outcomes = sql::parse_all(input)?
        .into_iter()
        .map(|parsed| ScriptOutcome {
            result: parsed
                .statement
                .map_err(Error::from)
                .and_then(|statement| engine.execute(&statement).map_err(Error::from)),
            statement: parsed.source,
        })
        .collect();

    Ok(outcomes)
}
