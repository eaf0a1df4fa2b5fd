//! Row matching and ordering helpers for the in-memory tables.

use std::cmp::Ordering;

use serde_json::Value;

use crate::domain::ports::{Filter, Row};

/// Whether `row` satisfies every equality filter.
pub(super) fn matches_filters(row: &Row, filters: &[Filter]) -> bool {
    filters
        .iter()
        .all(|filter| row.get(filter.column).is_some_and(|value| same_value(value, &filter.value)))
}

// Numbers compare by value: `1` matches `1.0`.
fn same_value(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Number(left), Value::Number(right)) => left.as_f64() == right.as_f64(),
        _ => left == right,
    }
}

/// Order two rows by one column. Missing values sort first.
pub(super) fn compare_column(left: &Row, right: &Row, column: &str) -> Ordering {
    match (left.get(column), right.get(column)) {
        (Some(Value::Number(left)), Some(Value::Number(right))) => left
            .as_f64()
            .partial_cmp(&right.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(Value::String(left)), Some(Value::String(right))) => left.cmp(right),
        (None | Some(Value::Null), None | Some(Value::Null)) => Ordering::Equal,
        (None | Some(Value::Null), Some(_)) => Ordering::Less,
        (Some(_), None | Some(Value::Null)) => Ordering::Greater,
        _ => Ordering::Equal,
    }
}

/// Copy only `columns` out of `row`.
pub(super) fn project(row: &Row, columns: &[&str]) -> Row {
    columns
        .iter()
        .filter_map(|column| {
            row.get(*column)
                .map(|value| ((*column).to_owned(), value.clone()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn row(value: Value) -> Row {
        match value {
            Value::Object(map) => map,
            _ => panic!("row fixtures must be objects"),
        }
    }

    #[rstest]
    #[case(json!({"id": 1, "status": "Pending"}), vec![Filter::eq("status", "Pending")], true)]
    #[case(json!({"id": 1, "status": "Pending"}), vec![Filter::eq("status", "Resolved")], false)]
    #[case(json!({"id": 1}), vec![Filter::eq("status", "Pending")], false)]
    #[case(json!({"id": 1}), vec![Filter::eq("id", 1.0)], true)]
    #[case(json!({"id": 1}), vec![], true)]
    fn filters_are_conjunctive_equality(
        #[case] value: Value,
        #[case] filters: Vec<Filter>,
        #[case] expected: bool,
    ) {
        assert_eq!(matches_filters(&row(value), &filters), expected);
    }

    #[rstest]
    fn rfc3339_timestamps_order_chronologically() {
        let older = row(json!({"created_at": "2026-01-01T09:00:00+00:00"}));
        let newer = row(json!({"created_at": "2026-01-02T08:00:00+00:00"}));
        assert_eq!(compare_column(&older, &newer, "created_at"), Ordering::Less);
    }

    #[rstest]
    fn missing_values_sort_first() {
        let missing = row(json!({}));
        let present = row(json!({"id": 3}));
        assert_eq!(compare_column(&missing, &present, "id"), Ordering::Less);
    }

    #[rstest]
    fn projection_keeps_requested_columns() {
        let profile =
            row(json!({"id": "u-1", "full_name": "Ada", "email": "a@x.com", "role": "admin"}));
        let projected = project(&profile, &["full_name", "email", "phone"]);
        assert_eq!(Value::Object(projected), json!({"full_name": "Ada", "email": "a@x.com"}));
    }
}
