// SPDX-FileCopyrightText: 2026 Cortex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wire types for the Neo4j HTTP transaction API.
//!
//! A request carries one or more Cypher statements with named parameters;
//! the response carries one result table per statement, rows encoded
//! positionally in column order.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One Cypher statement with its named parameters.
#[derive(Debug, Clone, Serialize)]
pub struct CypherStatement {
    pub statement: String,
    pub parameters: Value,
}

/// Body posted to `/db/{database}/tx/commit`.
#[derive(Debug, Clone, Serialize)]
pub struct TxRequest {
    pub statements: Vec<CypherStatement>,
}

/// Top-level transaction response.
#[derive(Debug, Clone, Deserialize)]
pub struct TxResponse {
    #[serde(default)]
    pub results: Vec<QueryResult>,
    #[serde(default)]
    pub errors: Vec<Neo4jApiError>,
}

/// Result table for a single statement.
#[derive(Debug, Clone, Deserialize)]
pub struct QueryResult {
    #[serde(default)]
    pub columns: Vec<String>,
    #[serde(default)]
    pub data: Vec<RowEntry>,
}

/// One row, values in the same order as `columns`.
#[derive(Debug, Clone, Deserialize)]
pub struct RowEntry {
    #[serde(default)]
    pub row: Vec<Value>,
}

/// Server-side error reported in the `errors` array.
#[derive(Debug, Clone, Deserialize)]
pub struct Neo4jApiError {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub message: String,
}

/// Reads a string cell, treating anything else as absent.
pub(crate) fn cell_str(row: &[Value], idx: usize) -> Option<String> {
    match row.get(idx) {
        Some(Value::String(s)) => Some(s.clone()),
        _ => None,
    }
}

/// Reads an integer cell, treating anything else as absent.
pub(crate) fn cell_i64(row: &[Value], idx: usize) -> Option<i64> {
    match row.get(idx) {
        Some(Value::Number(n)) => n.as_i64(),
        _ => None,
    }
}

/// Reads a temporal cell.
///
/// Neo4j serializes datetimes as ISO-8601 strings, optionally suffixed
/// with a zone id in brackets (`2024-01-15T10:30:00+00:00[UTC]`). Values
/// that fail to parse are treated as absent rather than failing the row.
pub(crate) fn cell_datetime(row: &[Value], idx: usize) -> Option<DateTime<Utc>> {
    let raw = match row.get(idx) {
        Some(Value::String(s)) => s.as_str(),
        _ => return None,
    };
    let trimmed = match raw.find('[') {
        Some(pos) => &raw[..pos],
        None => raw,
    };
    DateTime::parse_from_rfc3339(trimmed)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}
