//! Record store contract and the statement/row types that cross it.

#[cfg(test)]
pub(crate) mod memory;
mod postgres;
pub mod records;

use std::fmt;

use chrono::NaiveDate;

use crate::error::StoreError;

pub use postgres::Database;

/// A typed value bound into a statement or read back from a row
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Text(String),
    Integer(i64),
    Decimal(f64),
    Boolean(bool),
    Date(NaiveDate),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("-"),
            Value::Text(text) => f.write_str(text),
            Value::Integer(n) => write!(f, "{n}"),
            Value::Decimal(n) => write!(f, "{n:.2}"),
            Value::Boolean(b) => write!(f, "{b}"),
            Value::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<Option<String>> for Value {
    fn from(value: Option<String>) -> Self {
        value.map_or(Value::Null, Value::Text)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Decimal(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl From<NaiveDate> for Value {
    fn from(value: NaiveDate) -> Self {
        Value::Date(value)
    }
}

/// The four tables the manager works with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Table {
    Projects,
    Architects,
    Contractors,
    Customers,
}

impl Table {
    pub fn name(self) -> &'static str {
        match self {
            Table::Projects => "Projects",
            Table::Architects => "Architects",
            Table::Contractors => "Contractors",
            Table::Customers => "Customers",
        }
    }

    pub fn columns(self) -> &'static [&'static str] {
        match self {
            Table::Projects => &[
                "project_number",
                "architect_id",
                "contractor_id",
                "customer_id",
                "project_name",
                "building_type",
                "physical_address",
                "erf_number",
                "total_fee",
                "amount_paid",
                "project_deadline",
                "project_finalised",
                "completion_date",
            ],
            Table::Architects => &[
                "architect_id",
                "architect_name",
                "architect_tel",
                "architect_email",
                "architect_address",
            ],
            Table::Contractors => &[
                "contractor_id",
                "contractor_name",
                "contractor_tel",
                "contractor_email",
                "contractor_address",
            ],
            Table::Customers => &[
                "customer_id",
                "customer_fname",
                "customer_surname",
                "customer_tel",
                "customer_email",
                "customer_address",
            ],
        }
    }

    /// Resolve `column` to this table's own spelling, refusing anything else.
    ///
    /// Identifiers cannot be bound as parameters, so only names from the
    /// fixed column list ever reach statement text.
    pub fn column(self, column: &str) -> Result<&'static str, StoreError> {
        self.columns()
            .iter()
            .copied()
            .find(|known| *known == column)
            .ok_or_else(|| StoreError::UnknownColumn {
                table: self.name(),
                column: column.to_owned(),
            })
    }
}

/// Statement template with `$n` placeholders and its ordered arguments
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    sql: String,
    args: Vec<Value>,
}

impl Statement {
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            args: Vec::new(),
        }
    }

    /// Append the argument for the next placeholder
    pub fn bind(mut self, value: impl Into<Value>) -> Self {
        self.args.push(value.into());
        self
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn args(&self) -> &[Value] {
        &self.args
    }

    pub fn select_where(table: Table, column: &str, value: impl Into<Value>) -> Result<Self, StoreError> {
        let column = table.column(column)?;
        Ok(Self::new(format!("SELECT * FROM {} WHERE {column} = $1", table.name())).bind(value))
    }

    pub fn count_where(table: Table, column: &str, value: impl Into<Value>) -> Result<Self, StoreError> {
        let column = table.column(column)?;
        Ok(Self::new(format!("SELECT COUNT(*) AS total FROM {} WHERE {column} = $1", table.name())).bind(value))
    }

    pub fn delete_where(table: Table, column: &str, value: impl Into<Value>) -> Result<Self, StoreError> {
        let column = table.column(column)?;
        Ok(Self::new(format!("DELETE FROM {} WHERE {column} = $1", table.name())).bind(value))
    }
}

/// One result row: column names in select order with their values
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Row {
    columns: Vec<(String, Value)>,
}

impl Row {
    pub fn new(columns: Vec<(String, Value)>) -> Self {
        Self { columns }
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.columns
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    #[cfg(test)]
    pub fn set(&mut self, column: &str, value: Value) {
        match self.columns.iter_mut().find(|(name, _)| name == column) {
            Some((_, slot)) => *slot = value,
            None => self.columns.push((column.to_owned(), value)),
        }
    }

    fn require(&self, column: &str) -> Result<&Value, StoreError> {
        self.get(column)
            .ok_or_else(|| StoreError::MissingColumn(column.to_owned()))
    }

    fn mismatch(column: &str, expected: &'static str) -> StoreError {
        StoreError::ColumnType {
            column: column.to_owned(),
            expected,
        }
    }

    pub fn text(&self, column: &str) -> Result<String, StoreError> {
        match self.require(column)? {
            Value::Text(text) => Ok(text.clone()),
            _ => Err(Self::mismatch(column, "text")),
        }
    }

    pub fn optional_text(&self, column: &str) -> Result<Option<String>, StoreError> {
        match self.require(column)? {
            Value::Null => Ok(None),
            Value::Text(text) => Ok(Some(text.clone())),
            _ => Err(Self::mismatch(column, "text")),
        }
    }

    pub fn integer(&self, column: &str) -> Result<i64, StoreError> {
        match self.require(column)? {
            Value::Integer(n) => Ok(*n),
            _ => Err(Self::mismatch(column, "an integer")),
        }
    }

    pub fn decimal(&self, column: &str) -> Result<f64, StoreError> {
        match self.require(column)? {
            Value::Decimal(n) => Ok(*n),
            // Integer columns widen losslessly for the sizes used here
            Value::Integer(n) => Ok(*n as f64),
            _ => Err(Self::mismatch(column, "a number")),
        }
    }

    pub fn boolean(&self, column: &str) -> Result<bool, StoreError> {
        match self.require(column)? {
            Value::Boolean(b) => Ok(*b),
            _ => Err(Self::mismatch(column, "a boolean")),
        }
    }

    pub fn date(&self, column: &str) -> Result<NaiveDate, StoreError> {
        match self.require(column)? {
            Value::Date(d) => Ok(*d),
            _ => Err(Self::mismatch(column, "a date")),
        }
    }

    pub fn optional_date(&self, column: &str) -> Result<Option<NaiveDate>, StoreError> {
        match self.require(column)? {
            Value::Null => Ok(None),
            Value::Date(d) => Ok(Some(*d)),
            _ => Err(Self::mismatch(column, "a date")),
        }
    }
}

/// Query execution capability the manager runs on.
///
/// One logical session: calls are issued one at a time and `begin`,
/// `commit` and `rollback` bracket the statements in between.
#[allow(async_fn_in_trait)]
pub trait RecordStore {
    /// Run a write, returning the number of affected rows
    async fn execute(&mut self, statement: &Statement) -> Result<u64, StoreError>;

    /// Run a read, returning every row
    async fn query(&mut self, statement: &Statement) -> Result<Vec<Row>, StoreError>;

    async fn begin(&mut self) -> Result<(), StoreError>;

    async fn commit(&mut self) -> Result<(), StoreError>;

    async fn rollback(&mut self) -> Result<(), StoreError>;
}
