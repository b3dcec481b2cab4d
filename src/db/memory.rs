//! In-memory [`RecordStore`] for tests.
//!
//! Understands the statement shapes the manager issues with a single
//! `column = $n` condition, plus INSERT and UPDATE. Anything else reads as
//! empty. Every statement is logged; transactions work on a snapshot.

use std::collections::HashMap;

use crate::db::{RecordStore, Row, Statement, Table, Value};
use crate::error::StoreError;

const TABLES: [Table; 4] = [Table::Projects, Table::Architects, Table::Contractors, Table::Customers];

#[derive(Debug, Default)]
pub(crate) struct MemoryStore {
    tables: HashMap<&'static str, Vec<Row>>,
    snapshot: Option<HashMap<&'static str, Vec<Row>>>,
    log: Vec<Statement>,
    transactions: Vec<&'static str>,
    fail_on: Option<String>,
    last_project: i64,
}

impl MemoryStore {
    pub(crate) fn rows(&self, table: Table) -> &[Row] {
        self.tables.get(table.name()).map(Vec::as_slice).unwrap_or(&[])
    }

    pub(crate) fn log(&self) -> &[Statement] {
        &self.log
    }

    /// "begin", "commit" and "rollback" in the order they happened
    pub(crate) fn transactions(&self) -> &[&'static str] {
        &self.transactions
    }

    /// Fail every later statement whose text starts with `prefix`
    pub(crate) fn fail_on(&mut self, prefix: &str) {
        self.fail_on = Some(prefix.to_owned());
    }

    pub(crate) fn seed_project(&mut self, number: i64, architect: &str, contractor: &str, customer: &str) {
        let row = crate::models::project_row(number, architect, contractor, customer);
        self.last_project = self.last_project.max(number);
        self.tables.entry(Table::Projects.name()).or_default().push(row);
    }

    pub(crate) fn seed_party(&mut self, table: Table, id: &str) {
        let columns = table
            .columns()
            .iter()
            .enumerate()
            .map(|(i, column)| {
                let value = if i == 0 { id.to_owned() } else { format!("{id} {column}") };
                (column.to_string(), Value::Text(value))
            })
            .collect();
        self.tables.entry(table.name()).or_default().push(Row::new(columns));
    }

    pub(crate) fn ids(&self, table: Table) -> Vec<String> {
        let id_column = table.columns()[0];
        self.rows(table)
            .iter()
            .filter_map(|row| row.get(id_column).map(ToString::to_string))
            .collect()
    }

    fn check_failure(&self, statement: &Statement) -> Result<(), StoreError> {
        match &self.fail_on {
            Some(prefix) if statement.sql().starts_with(prefix.as_str()) => Err(StoreError::Sql(
                sqlx::Error::Protocol(format!("injected failure for `{}`", statement.sql())),
            )),
            _ => Ok(()),
        }
    }

    fn insert(&mut self, table: Table, sql: &str, args: &[Value]) -> Row {
        let open = sql.find('(').unwrap_or(0);
        let close = sql.find(')').unwrap_or(open);
        let given: Vec<&str> = sql[open + 1..close].split(',').map(str::trim).collect();

        let mut row = Row::default();
        for column in table.columns() {
            let value = given
                .iter()
                .position(|name| name == column)
                .and_then(|i| args.get(i).cloned())
                .unwrap_or(Value::Null);
            row.set(column, value);
        }
        if table == Table::Projects {
            self.last_project += 1;
            row.set("project_number", Value::Integer(self.last_project));
        }
        self.tables.entry(table.name()).or_default().push(row.clone());
        row
    }

    fn update(&mut self, table: Table, sql: &str, args: &[Value]) -> u64 {
        let Some((set, condition)) = sql.split_once(" SET ").and_then(|(_, rest)| rest.split_once(" WHERE ")) else {
            return 0;
        };
        let Some((key, key_value)) = assignment(condition, args) else {
            return 0;
        };
        let assignments: Vec<(String, Value)> =
            set.split(", ").filter_map(|part| assignment(part, args)).collect();

        let mut changed = 0;
        for row in self.tables.entry(table.name()).or_default() {
            if row.get(&key) == Some(&key_value) {
                for (column, value) in &assignments {
                    row.set(column, value.clone());
                }
                changed += 1;
            }
        }
        changed
    }
}

/// Split `column = $n[::type]` into the column and its bound argument
fn assignment(part: &str, args: &[Value]) -> Option<(String, Value)> {
    let (column, placeholder) = part.split_once(" = ")?;
    let placeholder = placeholder.trim().split("::").next()?;
    let index = placeholder.strip_prefix('$')?.parse::<usize>().ok()?;
    Some((column.trim().to_owned(), args.get(index.checked_sub(1)?)?.clone()))
}

fn table_named(name: &str) -> Option<Table> {
    TABLES.into_iter().find(|table| table.name() == name)
}

/// `... FROM <table> [WHERE <column> = $1] [ORDER BY ...]` from `tokens[at]` on
fn filter(tokens: &[&str], at: usize) -> Option<(Table, Option<String>)> {
    let table = table_named(tokens.get(at)?)?;
    match tokens.get(at + 1..) {
        Some([]) | Some(["ORDER", ..]) => Some((table, None)),
        Some(["WHERE", column, "=", "$1"]) | Some(["WHERE", column, "=", "$1", "ORDER", ..]) => {
            Some((table, Some((*column).to_owned())))
        }
        _ => None,
    }
}

impl MemoryStore {
    fn matching(&self, table: Table, column: &Option<String>, args: &[Value]) -> Vec<Row> {
        self.rows(table)
            .iter()
            .filter(|row| match column {
                Some(column) => row.get(column) == args.first(),
                None => true,
            })
            .cloned()
            .collect()
    }
}

impl RecordStore for MemoryStore {
    async fn execute(&mut self, statement: &Statement) -> Result<u64, StoreError> {
        self.log.push(statement.clone());
        self.check_failure(statement)?;

        let sql = statement.sql();
        let tokens: Vec<&str> = sql.split_whitespace().collect();
        match tokens.as_slice() {
            ["DELETE", "FROM", ..] => {
                let Some((table, Some(column))) = filter(&tokens, 2) else {
                    return Ok(0);
                };
                let key = statement.args().first().cloned();
                let rows = self.tables.entry(table.name()).or_default();
                let before = rows.len();
                rows.retain(|row| row.get(&column) != key.as_ref());
                Ok((before - rows.len()) as u64)
            }
            ["INSERT", "INTO", name, ..] => match table_named(name) {
                Some(table) => {
                    self.insert(table, sql, statement.args());
                    Ok(1)
                }
                None => Ok(0),
            },
            ["UPDATE", name, ..] => match table_named(name) {
                Some(table) => Ok(self.update(table, sql, statement.args())),
                None => Ok(0),
            },
            _ => Ok(0),
        }
    }

    async fn query(&mut self, statement: &Statement) -> Result<Vec<Row>, StoreError> {
        self.log.push(statement.clone());
        self.check_failure(statement)?;

        let sql = statement.sql();
        let tokens: Vec<&str> = sql.split_whitespace().collect();
        match tokens.as_slice() {
            ["SELECT", "COUNT(*)", "AS", "total", "FROM", ..] => {
                let total = match filter(&tokens, 5) {
                    Some((table, column)) => self.matching(table, &column, statement.args()).len(),
                    None => 0,
                };
                Ok(vec![Row::new(vec![("total".to_string(), Value::Integer(total as i64))])])
            }
            ["SELECT", "*", "FROM", ..] => Ok(match filter(&tokens, 3) {
                Some((table, column)) => self.matching(table, &column, statement.args()),
                None => Vec::new(),
            }),
            ["INSERT", "INTO", name, ..] => match table_named(name) {
                Some(table) => Ok(vec![self.insert(table, sql, statement.args())]),
                None => Ok(Vec::new()),
            },
            _ => Ok(Vec::new()),
        }
    }

    async fn begin(&mut self) -> Result<(), StoreError> {
        self.transactions.push("begin");
        self.snapshot = Some(self.tables.clone());
        Ok(())
    }

    async fn commit(&mut self) -> Result<(), StoreError> {
        self.transactions.push("commit");
        self.snapshot = None;
        Ok(())
    }

    async fn rollback(&mut self) -> Result<(), StoreError> {
        self.transactions.push("rollback");
        if let Some(tables) = self.snapshot.take() {
            self.tables = tables;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    #[tokio::test]
    async fn rollback_restores_snapshot() {
        let mut store = MemoryStore::default();
        store.seed_project(1, "A1", "K1", "C1");

        store.begin().await.unwrap();
        let delete = Statement::delete_where(Table::Projects, "project_number", 1_i64).unwrap();
        assert_eq!(store.execute(&delete).await.unwrap(), 1);
        assert!(store.rows(Table::Projects).is_empty());
        store.rollback().await.unwrap();

        assert_eq!(store.rows(Table::Projects).len(), 1);
    }

    #[tokio::test]
    async fn update_sets_bound_columns() {
        let mut store = MemoryStore::default();
        store.seed_project(4, "A1", "K1", "C1");
        let completed = NaiveDate::from_ymd_opt(2025, 2, 1).unwrap();
        let statement = Statement::new(
            "UPDATE Projects SET project_finalised = $1, completion_date = $2 WHERE project_number = $3",
        )
        .bind(true)
        .bind(completed)
        .bind(4_i64);

        assert_eq!(store.execute(&statement).await.unwrap(), 1);
        let row = &store.rows(Table::Projects)[0];
        assert_eq!(row.get("completion_date"), Some(&Value::Date(completed)));
    }
}
