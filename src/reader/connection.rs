//! The database connection boundary.
//!
//! The planner never talks to a driver directly; it issues introspection
//! queries through this trait. The real implementation (connection pooling,
//! transactions, driver detection) lives outside this crate.

use anyhow::Result;

/// A single cell value in an introspection rowset.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Text(String),
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Lenient boolean coercion: drivers report flags as booleans, 0/1
    /// integers, or YES/NO style strings depending on the catalog queried.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            Value::Int(i) => Some(*i != 0),
            Value::Text(s) => match s.as_str() {
                "YES" | "yes" | "t" | "true" | "1" => Some(true),
                "NO" | "no" | "f" | "false" | "0" => Some(false),
                _ => None,
            },
            Value::Null => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

/// One row of an introspection rowset, with named columns.
#[derive(Debug, Clone, Default)]
pub struct Row {
    values: Vec<(String, Value)>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.push((name.into(), value.into()));
        self
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    /// Text value of a column; `None` for NULL, missing, or non-text cells.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_str)
    }

    pub fn boolean(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(Value::as_bool)
    }
}

/// Minimal synchronous connection contract consumed by the Schema Reader.
pub trait Connection {
    /// Execute a query and return all rows. Blocking; cancellation and
    /// timeouts are the connection layer's concern.
    fn execute_query(&mut self, sql: &str, params: &[Value]) -> Result<Vec<Row>>;

    /// Lowercase driver identifier, e.g. `postgres`, `mysql`, `sqlite`.
    fn driver_name(&self) -> &str;
}
