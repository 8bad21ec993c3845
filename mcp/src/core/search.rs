//! Filter-formula generation for text search.

use crate::{
    error::{GatewayError, GatewayResult},
    types::Table,
};

/// Escape a term for use inside a double-quoted formula string literal.
pub fn escape_formula_string(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if c == '"' || c == '\\' {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// `OR(FIND("term", {fld1}),FIND("term", {fld2}),...)`
pub fn search_formula(term: &str, field_ids: &[String]) -> String {
    let term = escape_formula_string(term);
    let clauses = field_ids
        .iter()
        .map(|id| format!("FIND(\"{term}\", {{{id}}})"))
        .collect::<Vec<_>>()
        .join(",");
    format!("OR({clauses})")
}

/// Fields to search: the requested ones if all are text fields of `table`,
/// otherwise every text field.
pub fn search_field_ids(table: &Table, requested: &[String]) -> GatewayResult<Vec<String>> {
    let searchable: Vec<&str> = table
        .fields
        .iter()
        .filter(|f| f.field_type.is_searchable_text())
        .map(|f| f.id.as_str())
        .collect();

    if searchable.is_empty() {
        return Err(GatewayError::validation("No text fields available to search"));
    }

    if requested.is_empty() {
        return Ok(searchable.into_iter().map(str::to_string).collect());
    }

    let invalid: Vec<&str> = requested
        .iter()
        .map(String::as_str)
        .filter(|id| !searchable.contains(id))
        .collect();
    if !invalid.is_empty() {
        return Err(GatewayError::validation(format!(
            "Invalid fields requested: {}",
            invalid.join(", ")
        )));
    }

    Ok(requested.to_vec())
}
