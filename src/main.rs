use std::{io::{self, stdin, BufRead, Write}, path::Path};

use anyhow::Context;
use clap::Parser;
use log::{error, info};

use tabsql::{config::Config, engine::{Engine, QueryResult}, logger, store::{file_store::FileStore, Store}};

fn main() -> anyhow::Result<()> {
    let config = Config::parse();
    logger::init(*config.debug());

    let store = FileStore::open(config.data_dir())
        .with_context(|| format!("open data directory {}", config.data_dir().display()))?;
    info!("Using data directory {}", store.base_path().display());
    let engine = Engine::new(store);

    match config.script() {
        Some(script) => run_script(&engine, script),
        None => cli(&engine),
    }
}

enum Input {
    Line,
    Invalid(io::Error),
    Eof,
}

// A line that is not valid UTF-8 is consumed and reported, any other read
// failure ends the prompt.
fn next_line(reader: &mut impl BufRead, buffer: &mut String) -> anyhow::Result<Input> {
    match reader.read_line(buffer) {
        Ok(0) => Ok(Input::Eof),
        Ok(_) => Ok(Input::Line),
        Err(err) if err.kind() == io::ErrorKind::InvalidData => Ok(Input::Invalid(err)),
        Err(err) => Err(err).context("read stdin"),
    }
}

fn cli<S: Store>(engine: &Engine<S>) -> anyhow::Result<()> {
    print_flushed("tabsql> ")?;

    let mut stdin = stdin().lock();
    let mut line_buffer = String::new();

    loop {
        match next_line(&mut stdin, &mut line_buffer)? {
            Input::Eof => break,
            Input::Invalid(err) => {
                error!("Skipping unreadable input: {}", err);
                println!("Error: {}", err);
            }
            Input::Line => match line_buffer.trim() {
                ".exit" => break,
                ".tables" => display_tables(engine),
                "" => {}
                input => render(tabsql::execute_statement(engine, input)),
            },
        }

        print_flushed("tabsql> ")?;

        line_buffer.clear();
    }

    Ok(())
}

fn run_script<S: Store>(engine: &Engine<S>, script: &Path) -> anyhow::Result<()> {
    let content = std::fs::read_to_string(script)
        .with_context(|| format!("read script {}", script.display()))?;

    for outcome in tabsql::execute_script(engine, &content)? {
        println!("> {}", outcome.statement);
        render(outcome.result);
        println!();
    }

    Ok(())
}

fn display_tables<S: Store>(engine: &Engine<S>) {
    match engine.list_tables() {
        Ok(tables) => println!("{}", tables.join(" ")),
        Err(err) => render(Err(err.into())),
    }
}

fn render(result: Result<QueryResult, tabsql::Error>) {
    match result {
        Ok(result) => println!("{}", result),
        Err(err) => {
            error!("{}", err);
            println!("Error: {}", err);
        }
    }
}

fn print_flushed(s: &str) -> anyhow::Result<()> {
    print!("{}", s);
    std::io::stdout().flush().context("flush stdout")
}
