//! List filtering
//!
//! `filter` takes comma-separated clauses, values optionally quoted:
//! `field=value` matches exactly, `field:value` matches any value containing
//! it, ignoring case. `title='Source 2',url:census` combines both. `search`
//! matches case-insensitively against every string attribute.
//!
//! Queries run over projections, so a caller can only filter or search on
//! properties its role is allowed to read.

use serde_json::{json, Value};
use warden_engine::{EngineError, EngineResult, EngineSettings, ErrorBody, Params};

use crate::store::Record;

/// One `filter` clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Clause {
    /// `field=value`
    Equals(String, String),
    /// `field:value`, value lowercased
    Contains(String, String),
}

impl Clause {
    fn matches(&self, record: &Record) -> bool {
        let (field, expected) = match self {
            Clause::Equals(field, expected) | Clause::Contains(field, expected) => {
                (field, expected)
            }
        };
        let actual = match record.get(field) {
            Some(Value::String(actual)) => actual.clone(),
            Some(Value::Null) | None => return false,
            Some(other) => other.to_string(),
        };
        match self {
            Clause::Equals(..) => actual == *expected,
            Clause::Contains(..) => actual.to_lowercase().contains(expected.as_str()),
        }
    }
}

/// Parsed list query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    /// Filter clauses, all of which must match.
    pub filters: Vec<Clause>,
    /// Lowercased search term.
    pub search: Option<String>,
}

impl ListQuery {
    /// Read the filter and search parameters named by `settings`.
    ///
    /// # Errors
    ///
    /// `EngineError::BadRequest` naming every clause that is neither
    /// `field=value` nor `field:value`.
    pub fn from_params(params: &Params, settings: &EngineSettings) -> EngineResult<Self> {
        let filters = match params.get(&settings.filter_key).and_then(Value::as_str) {
            Some(filter) => parse_filter(filter)?,
            None => Vec::new(),
        };
        let search = params
            .get(&settings.search_key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|term| !term.is_empty())
            .map(str::to_lowercase);
        Ok(Self { filters, search })
    }

    /// Does `record` pass every clause and the search term?
    pub fn matches(&self, record: &Record) -> bool {
        let filtered = self.filters.iter().all(|clause| clause.matches(record));
        let searched = self.search.as_ref().map_or(true, |term| {
            record.iter().any(|(key, value)| {
                !key.starts_with('_')
                    && value
                        .as_str()
                        .is_some_and(|text| text.to_lowercase().contains(term.as_str()))
            })
        });
        filtered && searched
    }
}

fn parse_filter(filter: &str) -> EngineResult<Vec<Clause>> {
    let mut clauses = Vec::new();
    let mut malformed = Vec::new();
    for clause in filter.split(',').map(str::trim).filter(|c| !c.is_empty()) {
        match parse_clause(clause) {
            Some(parsed) => clauses.push(parsed),
            None => malformed.push(clause.to_string()),
        }
    }

    if !malformed.is_empty() {
        tracing::debug!(clauses = ?malformed, "Rejected malformed filter");
        return Err(EngineError::BadRequest(ErrorBody::Errors(
            json!({ "invalid_filter": malformed }),
        )));
    }
    Ok(clauses)
}

fn parse_clause(clause: &str) -> Option<Clause> {
    let index = clause.find(|c: char| c == '=' || c == ':')?;
    let field = clause[..index].trim();
    if field.is_empty() {
        return None;
    }

    let value = clause[index + 1..].trim();
    let value = value
        .strip_prefix('\'')
        .and_then(|v| v.strip_suffix('\''))
        .or_else(|| value.strip_prefix('"').and_then(|v| v.strip_suffix('"')))
        .unwrap_or(value);

    let field = field.to_string();
    Some(if clause[index..].starts_with('=') {
        Clause::Equals(field, value.to_string())
    } else {
        Clause::Contains(field, value.to_lowercase())
    })
}
