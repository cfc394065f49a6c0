//! Shared test doubles for integration tests
//!
//! [`MemoryDatabase`] understands exactly the statements Veil generates for
//! the PostgreSQL dialect. Its state lives behind an `Arc<Mutex<_>>` so a test
//! can keep a handle after the client has been moved into a pipeline.

#![allow(dead_code)]

use async_trait::async_trait;
use regex::Regex;
use std::collections::{BTreeMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};
use veil::adapters::database::DatabaseClient;
use veil::config::Dialect;
use veil::core::consent::ConsentPrompt;
use veil::domain::{Result, Row, SqlValue, VeilError};

#[derive(Debug, Clone, Default)]
struct MemoryTable {
    primary_key: String,
    rows: BTreeMap<i64, Row>,
}

#[derive(Debug, Default)]
pub struct MemoryState {
    tables: BTreeMap<String, MemoryTable>,
    snapshot: Option<BTreeMap<String, MemoryTable>>,
    pub statements: Vec<String>,
    pub updates_executed: usize,
    pub begins: usize,
    pub commits: usize,
    pub rollbacks: usize,
    pub closed: bool,
    fail_update_at: Option<usize>,
    lost_on_count: Option<String>,
    rows_per_update: Option<u64>,
}

/// In-memory `DatabaseClient` speaking the PostgreSQL dialect
#[derive(Debug, Clone, Default)]
pub struct MemoryDatabase {
    state: Arc<Mutex<MemoryState>>,
}

fn unquote(ident: &str) -> String {
    ident.trim().trim_matches('"').replace("\"\"", "\"")
}

fn param(params: &[SqlValue], placeholder: &str) -> SqlValue {
    let index: usize = placeholder.trim_start_matches('$').parse().unwrap();
    params[index - 1].clone()
}

fn key_of(value: &SqlValue) -> i64 {
    match value {
        SqlValue::Int(k) => *k,
        other => panic!("memory database only supports integer keys, got {other:?}"),
    }
}

impl MemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create (or replace) a table with the given rows; every row must carry
    /// an integer `primary_key` column
    pub fn with_table(self, name: &str, primary_key: &str, rows: Vec<Row>) -> Self {
        let rows = rows
            .into_iter()
            .map(|row| (key_of(row.get(primary_key).unwrap()), row))
            .collect();
        self.state().tables.insert(
            name.to_string(),
            MemoryTable {
                primary_key: primary_key.to_string(),
                rows,
            },
        );
        self
    }

    /// Fail the `k`-th UPDATE (1-based, counted over the whole run)
    pub fn fail_update_at(self, k: usize) -> Self {
        self.state().fail_update_at = Some(k);
        self
    }

    /// Report a lost connection when the table's rows are counted
    pub fn lose_connection_on_count(self, table: &str) -> Self {
        self.state().lost_on_count = Some(table.to_string());
        self
    }

    /// Report `n` affected rows for every UPDATE that finds its key, as a
    /// database would when the key column is not unique
    pub fn rows_per_update(self, n: u64) -> Self {
        self.state().rows_per_update = Some(n);
        self
    }

    pub fn state(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap()
    }

    pub fn rows(&self, table: &str) -> Vec<Row> {
        self.state().tables[table].rows.values().cloned().collect()
    }

    pub fn value(&self, table: &str, key: i64, column: &str) -> SqlValue {
        self.state().tables[table].rows[&key]
            .get(column)
            .cloned()
            .unwrap()
    }

    pub fn boxed(&self) -> Box<dyn DatabaseClient> {
        Box::new(self.clone())
    }
}

impl MemoryState {
    fn table(&mut self, name: &str) -> Result<&mut MemoryTable> {
        self.tables
            .get_mut(name)
            .ok_or_else(|| VeilError::Database(format!("relation \"{name}\" does not exist")))
    }

    fn query(&mut self, sql: &str, params: &[SqlValue]) -> Result<Vec<Row>> {
        let count = Regex::new(r#"^SELECT COUNT\(\*\) AS row_count FROM (".+")$"#).unwrap();
        let select =
            Regex::new(r#"^SELECT (.+) FROM (".+?") ORDER BY (".+?") LIMIT (\$1|1)(?: OFFSET \$2)?$"#)
                .unwrap();

        if let Some(caps) = count.captures(sql) {
            let name = unquote(&caps[1]);
            if self.lost_on_count.as_deref() == Some(name.as_str()) {
                return Err(VeilError::Connection("server closed the connection".to_string()));
            }
            let n = self.table(&name)?.rows.len() as i64;
            return Ok(vec![Row::new().with("row_count", n)]);
        }

        if let Some(caps) = select.captures(sql) {
            let columns: Vec<String> = caps[1].split(", ").map(unquote).collect();
            let table = self.table(&unquote(&caps[2]))?;
            let (limit, offset) = if &caps[4] == "1" {
                (1, 0)
            } else {
                (key_of(&params[0]) as usize, key_of(&params[1]) as usize)
            };

            let mut out = Vec::new();
            for row in table.rows.values().skip(offset).take(limit) {
                let mut projected = Row::new();
                for column in &columns {
                    let value = row.get(column).cloned().ok_or_else(|| {
                        VeilError::Database(format!("column \"{column}\" does not exist"))
                    })?;
                    projected.push(column.clone(), value);
                }
                out.push(projected);
            }
            return Ok(out);
        }

        Err(VeilError::Database(format!("unsupported query: {sql}")))
    }

    fn update(&mut self, sql: &str, params: &[SqlValue]) -> Result<u64> {
        let update = Regex::new(r#"^UPDATE (".+?") SET (.+) WHERE (".+?") = (\$\d+)$"#).unwrap();
        let assignment = Regex::new(r#"(".+?") = (\$\d+)"#).unwrap();
        let insert = Regex::new(r#"^INSERT INTO (".+?") \((.+)\) VALUES \((.+)\)$"#).unwrap();
        let delete = Regex::new(r#"^DELETE FROM (".+?")$"#).unwrap();
        let create = Regex::new(r#"^CREATE TABLE IF NOT EXISTS (".+?") \((".+?")"#).unwrap();

        if let Some(caps) = update.captures(sql) {
            self.updates_executed += 1;
            if self.fail_update_at == Some(self.updates_executed) {
                return Err(VeilError::Database("injected update failure".to_string()));
            }

            let key = key_of(&param(params, &caps[4]));
            let changes: Vec<(String, SqlValue)> = assignment
                .captures_iter(&caps[2])
                .map(|c| (unquote(&c[1]), param(params, &c[2])))
                .collect();

            let table = self.table(&unquote(&caps[1]))?;
            let Some(row) = table.rows.get_mut(&key) else {
                return Ok(0);
            };
            *row = row
                .iter()
                .map(|(column, value)| {
                    let value = changes
                        .iter()
                        .find(|(c, _)| c == column)
                        .map(|(_, v)| v.clone())
                        .unwrap_or_else(|| value.clone());
                    (column.to_string(), value)
                })
                .collect();
            return Ok(self.rows_per_update.unwrap_or(1));
        }

        if let Some(caps) = insert.captures(sql) {
            let columns: Vec<String> = caps[2].split(", ").map(unquote).collect();
            let placeholders: Vec<&str> = caps[3].split(", ").collect();
            let table = self.table(&unquote(&caps[1]))?;
            let row: Row = columns
                .iter()
                .zip(placeholders)
                .map(|(c, p)| (c.clone(), param(params, p)))
                .collect();
            let key = key_of(row.get(&table.primary_key).unwrap());
            table.rows.insert(key, row);
            return Ok(1);
        }

        if let Some(caps) = delete.captures(sql) {
            let table = self.table(&unquote(&caps[1]))?;
            let n = table.rows.len() as u64;
            table.rows.clear();
            return Ok(n);
        }

        if let Some(caps) = create.captures(sql) {
            let primary_key = unquote(&caps[2]);
            self.tables
                .entry(unquote(&caps[1]))
                .or_insert_with(|| MemoryTable {
                    primary_key,
                    rows: BTreeMap::new(),
                });
            return Ok(0);
        }

        Err(VeilError::Database(format!("unsupported statement: {sql}")))
    }
}

#[async_trait]
impl DatabaseClient for MemoryDatabase {
    fn dialect(&self) -> Dialect {
        Dialect::Postgres
    }

    async fn execute_query(&mut self, sql: &str, params: &[SqlValue]) -> Result<Vec<Row>> {
        let mut state = self.state();
        state.statements.push(sql.to_string());
        state.query(sql, params)
    }

    async fn execute_update(&mut self, sql: &str, params: &[SqlValue]) -> Result<u64> {
        let mut state = self.state();
        state.statements.push(sql.to_string());
        state.update(sql, params)
    }

    async fn begin(&mut self) -> Result<()> {
        let mut state = self.state();
        state.begins += 1;
        state.snapshot = Some(state.tables.clone());
        Ok(())
    }

    async fn commit(&mut self) -> Result<()> {
        let mut state = self.state();
        state.commits += 1;
        state.snapshot = None;
        Ok(())
    }

    async fn rollback(&mut self) -> Result<()> {
        let mut state = self.state();
        state.rollbacks += 1;
        if let Some(snapshot) = state.snapshot.take() {
            state.tables = snapshot;
        }
        Ok(())
    }

    async fn close(self: Box<Self>) -> Result<()> {
        self.state().closed = true;
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct ConsentLog {
    pub shown: Vec<String>,
    pub questions: Vec<String>,
}

/// Consent prompt that replays canned answers; declines once they run out
#[derive(Debug, Clone, Default)]
pub struct ScriptedConsent {
    answers: Arc<Mutex<VecDeque<bool>>>,
    log: Arc<Mutex<ConsentLog>>,
}

impl ScriptedConsent {
    pub fn new(answers: &[bool]) -> Self {
        Self {
            answers: Arc::new(Mutex::new(answers.iter().copied().collect())),
            log: Arc::default(),
        }
    }

    /// Approves every checkpoint of `tables` tables
    pub fn approve_all(tables: usize) -> Self {
        Self::new(&vec![true; tables * 2])
    }

    pub fn log(&self) -> MutexGuard<'_, ConsentLog> {
        self.log.lock().unwrap()
    }

    pub fn boxed(&self) -> Box<dyn ConsentPrompt> {
        Box::new(self.clone())
    }
}

impl ConsentPrompt for ScriptedConsent {
    fn show(&mut self, text: &str) -> Result<()> {
        self.log().shown.push(text.to_string());
        Ok(())
    }

    fn confirm(&mut self, question: &str) -> Result<bool> {
        self.log().questions.push(question.to_string());
        Ok(self.answers.lock().unwrap().pop_front().unwrap_or(false))
    }
}

/// The demo `users` rows
pub fn demo_users() -> Vec<Row> {
    vec![
        Row::new()
            .with("id", 1i64)
            .with("email", "john.doe@example.com")
            .with("phone", "1234567890")
            .with("password", "password123")
            .with("address", "123 Main St"),
        Row::new()
            .with("id", 2i64)
            .with("email", "jane.doe@example.com")
            .with("phone", "0987654321")
            .with("password", "password456")
            .with("address", "456 Elm St"),
    ]
}
