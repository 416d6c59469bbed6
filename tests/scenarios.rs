use tabsql::{
    engine::{Engine, QueryResult},
    execute_script, execute_statement,
    sql::{tokenizer::TokenizeError, ParseError},
    store::{file_store::FileStore, memory_store::MemoryStore},
    Error,
};
use tempfile::tempdir;

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

#[test]
fn create_insert_select_users() {
    let base_dir = tempdir().unwrap();
    let engine = Engine::new(FileStore::new(base_dir.path()));

    let created = execute_statement(&engine, "CREATE TABLE users (id INT, name VARCHAR(100))").unwrap();
    let inserted = execute_statement(&engine, "INSERT INTO users (id, name) VALUES (1, 'Jane Doe')").unwrap();
    let selected = execute_statement(&engine, "SELECT * FROM users").unwrap();

    assert_eq!(created, QueryResult::Empty);
    assert_eq!(inserted, QueryResult::Empty);
    assert_eq!(
        selected,
        QueryResult::RowSet {
            column_names: strings(&["id", "name"]),
            rows: vec![strings(&["1", "Jane Doe"])],
        }
    );

    let content = std::fs::read_to_string(base_dir.path().join("users.tsv")).unwrap();
    assert_eq!(content, "id\tname\n1\tJane Doe\n");
}

#[test]
fn created_table_has_header_and_no_rows() {
    let base_dir = tempdir().unwrap();
    let engine = Engine::new(FileStore::new(base_dir.path()));

    execute_statement(&engine, "CREATE TABLE t (c INT, b VARCHAR(3), a INT)").unwrap();

    assert_eq!(
        execute_statement(&engine, "SELECT * FROM t").unwrap(),
        QueryResult::RowSet { column_names: strings(&["c", "b", "a"]), rows: vec![] }
    );
}

#[test]
fn repeated_inserts_append_rows_in_order() {
    let engine = Engine::new(MemoryStore::new());
    execute_statement(&engine, "CREATE TABLE t (id INT, tag VARCHAR(10))").unwrap();

    for i in 0..5 {
        let insert = format!("INSERT INTO t (id, tag) VALUES ({}, 'tag {}')", i, i);
        execute_statement(&engine, &insert).unwrap();
    }

    let QueryResult::RowSet { column_names, rows } = execute_statement(&engine, "SELECT * FROM t").unwrap() else {
        panic!("expected a row set");
    };
    assert_eq!(column_names.len(), 2);
    assert_eq!(rows.len(), 5);
    for (i, row) in rows.iter().enumerate() {
        assert_eq!(row, &vec![i.to_string(), format!("tag {}", i)]);
    }
}

#[test]
fn rows_keep_the_arity_of_their_insert() {
    let engine = Engine::new(MemoryStore::new());
    execute_statement(&engine, "CREATE TABLE t (a INT, b INT)").unwrap();
    execute_statement(&engine, "INSERT INTO t (a, b) VALUES (1)").unwrap();
    execute_statement(&engine, "INSERT INTO t (b) VALUES (1, 2, 3)").unwrap();

    let QueryResult::RowSet { column_names, rows } = execute_statement(&engine, "SELECT * FROM t").unwrap() else {
        panic!("expected a row set");
    };
    assert_eq!(column_names.len(), 2);
    assert_eq!(rows, vec![strings(&["1"]), strings(&["1", "2", "3"])]);
}

#[test]
fn recreating_a_table_discards_its_rows() {
    let base_dir = tempdir().unwrap();
    let engine = Engine::new(FileStore::new(base_dir.path()));

    execute_statement(&engine, "CREATE TABLE t (a INT)").unwrap();
    execute_statement(&engine, "INSERT INTO t (a) VALUES (1)").unwrap();
    execute_statement(&engine, "CREATE TABLE t (a INT)").unwrap();

    assert_eq!(
        execute_statement(&engine, "SELECT * FROM t").unwrap(),
        QueryResult::RowSet { column_names: strings(&["a"]), rows: vec![] }
    );
}

#[test]
fn declared_types_are_not_enforced() {
    let engine = Engine::new(MemoryStore::new());
    execute_statement(&engine, "CREATE TABLE t (n INT, s VARCHAR(2))").unwrap();
    execute_statement(&engine, "INSERT INTO t (n, s) VALUES ('not a number', 'longer than two')").unwrap();

    let QueryResult::RowSet { rows, .. } = execute_statement(&engine, "SELECT * FROM t").unwrap() else {
        panic!("expected a row set");
    };
    assert_eq!(rows, vec![strings(&["not a number", "longer than two"])]);
}

#[test]
fn malformed_and_unsupported_statements_fail_to_parse() {
    let engine = Engine::new(MemoryStore::new());
    execute_statement(&engine, "CREATE TABLE users (id INT, name VARCHAR(100))").unwrap();

    assert!(matches!(
        execute_statement(&engine, "SELECT name FROM users"),
        Err(Error::Parse(ParseError::MalformedSelect(_)))
    ));
    assert_eq!(
        execute_statement(&engine, "DROP TABLE users").unwrap_err(),
        Error::Parse(ParseError::UnsupportedStatement("DROP".to_string()))
    );
}

#[test]
fn script_continues_after_failing_statements() {
    let base_dir = tempdir().unwrap();
    let engine = Engine::new(FileStore::new(base_dir.path()));

    let script = "
        CREATE TABLE users (id INT, name VARCHAR(100));
        INSERT INTO users (id, name) VALUES (1, 'Jane Doe');
        SELECT * FROM missing;
        SHOW TABLES;
        SELECT * FROM users;
    ";
    let outcomes = execute_script(&engine, script).unwrap();

    assert_eq!(outcomes.len(), 5);
    assert_eq!(outcomes[0].statement, "CREATE TABLE users (id INT, name VARCHAR(100));");
    assert!(outcomes[0].result.is_ok());
    assert!(outcomes[1].result.is_ok());
    assert!(matches!(outcomes[2].result, Err(Error::Engine(_))));
    assert!(matches!(outcomes[3].result, Err(Error::Parse(ParseError::UnsupportedStatement(_)))));
    assert_eq!(
        outcomes[4].result,
        Ok(QueryResult::RowSet {
            column_names: strings(&["id", "name"]),
            rows: vec![strings(&["1", "Jane Doe"])],
        })
    );
}

#[test]
fn script_runs_statements_around_an_unbalanced_one() {
    let base_dir = tempdir().unwrap();
    let engine = Engine::new(FileStore::new(base_dir.path()));

    let outcomes = execute_script(&engine, "CREATE TABLE t (a INT); INSERT INTO t (a) VALUES (1; SELECT * FROM t;").unwrap();

    assert_eq!(outcomes.len(), 3);
    assert_eq!(outcomes[0].result, Ok(QueryResult::Empty));
    assert_eq!(outcomes[1].statement, "INSERT INTO t (a) VALUES (1;");
    assert_eq!(
        outcomes[1].result,
        Err(Error::Parse(ParseError::Tokenize(TokenizeError::UnbalancedParenthesis)))
    );
    assert_eq!(
        outcomes[2].result,
        Ok(QueryResult::RowSet { column_names: strings(&["a"]), rows: vec![] })
    );
}

#[test]
fn script_with_unterminated_string_runs_nothing() {
    let base_dir = tempdir().unwrap();
    let engine = Engine::new(FileStore::new(base_dir.path()));

    let result = execute_script(&engine, "CREATE TABLE t (a INT); INSERT INTO t (a) VALUES ('open);");

    assert_eq!(
        result.unwrap_err(),
        Error::Parse(ParseError::Tokenize(TokenizeError::UnterminatedString))
    );
    assert!(!base_dir.path().join("t.tsv").exists());
}
