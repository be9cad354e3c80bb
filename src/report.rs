//! Text helpers for the console report.

use mongodb::bson::{Bson, Document};
use std::fmt;

/// Printed in place of a field the document does not have.
pub const MISSING: &str = "n/a";

/// Displays an optional document field, falling back to [`MISSING`].
pub struct Field<'a, T>(pub &'a Option<T>);

impl<T: fmt::Display> fmt::Display for Field<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(value) => fmt::Display::fmt(value, f),
            None => f.write_str(MISSING),
        }
    }
}

pub fn field<T>(value: &Option<T>) -> Field<'_, T> {
    Field(value)
}

pub fn section_header(title: &str) -> String {
    format!("=== {} ===", title)
}

/// Renders an index key pattern as compact JSON, keeping the key order.
pub fn format_index_key(keys: &Document) -> String {
    let parts: Vec<String> = keys
        .iter()
        .map(|(name, direction)| {
            let name = serde_json::to_string(name).unwrap_or_else(|_| format!("\"{}\"", name));
            format!("{}:{}", name, json_value(direction))
        })
        .collect();
    format!("{{{}}}", parts.join(","))
}

fn json_value(value: &Bson) -> String {
    match value {
        Bson::Int32(v) => v.to_string(),
        Bson::Int64(v) => v.to_string(),
        Bson::Double(v) => v.to_string(),
        other => other.clone().into_relaxed_extjson().to_string(),
    }
}

/// Two decimal places, as prices are shown in the summary.
pub fn format_amount(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.2}", v),
        None => MISSING.to_string(),
    }
}

pub fn format_rounded(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{}", v.round() as i64),
        None => MISSING.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::doc;

    #[test]
    fn test_field_prints_value_or_placeholder() {
        assert_eq!(format!("${}", field(&Some(15.99))), "$15.99");
        assert_eq!(format!("${}", field(&Some(10.0))), "$10");
        assert_eq!(format!("{}", field::<String>(&None)), "n/a");
    }

    #[test]
    fn test_index_key_keeps_declaration_order() {
        assert_eq!(format_index_key(&doc! { "_id": 1 }), r#"{"_id":1}"#);
        assert_eq!(
            format_index_key(&doc! { "published_year": -1, "author": 1 }),
            r#"{"published_year":-1,"author":1}"#
        );
        assert_eq!(format_index_key(&doc! { "title": "text" }), r#"{"title":"text"}"#);
    }

    #[test]
    fn test_amount_and_rounding() {
        assert_eq!(format_amount(Some(11.6525)), "11.65");
        assert_eq!(format_amount(None), "n/a");
        assert_eq!(format_rounded(Some(388.5)), "389");
        assert_eq!(format_rounded(Some(388.25)), "388");
    }

    #[test]
    fn test_section_header() {
        assert_eq!(section_header("TASK 5: INDEXING"), "=== TASK 5: INDEXING ===");
    }
}
