use uuid::Uuid;

use crate::database::manager::DatabaseError;

/// Typed value for an equality condition. The schema here is static, so the
/// supported bind types are enumerated instead of going through JSON.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    Uuid(Uuid),
    Int(i64),
    Text(String),
}

impl From<Uuid> for FilterValue {
    fn from(v: Uuid) -> Self {
        FilterValue::Uuid(v)
    }
}

impl From<i64> for FilterValue {
    fn from(v: i64) -> Self {
        FilterValue::Int(v)
    }
}

impl From<i32> for FilterValue {
    fn from(v: i32) -> Self {
        FilterValue::Int(v as i64)
    }
}

impl From<&str> for FilterValue {
    fn from(v: &str) -> Self {
        FilterValue::Text(v.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(v: String) -> Self {
        FilterValue::Text(v)
    }
}

/// Equality-only predicate builder for list and count queries. Conditions are
/// ANDed; columns are validated as SQL identifiers before they reach a query.
#[derive(Debug, Clone, Default)]
pub struct ListFilter {
    conditions: Vec<(String, FilterValue)>,
}

impl ListFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eq(mut self, column: &str, value: impl Into<FilterValue>) -> Result<Self, DatabaseError> {
        validate_identifier(column)
            .map_err(|msg| DatabaseError::QueryError(format!("invalid filter column: {}", msg)))?;
        self.conditions.push((column.to_string(), value.into()));
        Ok(self)
    }

    /// Add an equality condition only when the value is present. Keeps
    /// optional query parameters out of the happy path at call sites.
    pub fn maybe(self, column: &str, value: Option<impl Into<FilterValue>>) -> Result<Self, DatabaseError> {
        match value {
            Some(v) => self.eq(column, v),
            None => Ok(self),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Values in condition order, for binding.
    pub fn values(&self) -> impl Iterator<Item = &FilterValue> {
        self.conditions.iter().map(|(_, v)| v)
    }

    /// Render the predicate with placeholders numbered from
    /// `first_placeholder`. Empty when there are no conditions.
    pub fn predicate(&self, first_placeholder: usize) -> String {
        self.conditions
            .iter()
            .enumerate()
            .map(|(i, (column, _))| format!("\"{}\" = ${}", column, first_placeholder + i))
            .collect::<Vec<_>>()
            .join(" AND ")
    }
}

/// Validate a SQL identifier (table or column name): alphanumeric and
/// underscore only, not starting with a digit.
pub fn validate_identifier(name: &str) -> Result<(), String> {
    if name.is_empty() {
        return Err("identifier cannot be empty".to_string());
    }
    let first = name.chars().next().unwrap();
    if !first.is_ascii_alphabetic() && first != '_' {
        return Err(format!("identifier cannot start with '{}'", first));
    }
    if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(format!("invalid identifier: {}", name));
    }
    Ok(())
}
