// src/common/query_builder.rs
//! Dynamic entry builder
//!
//! Turns a partial, serializable record plus a column allow-list into
//! parameterized SQL fragments. Column order, placeholder indices and the
//! bound value array are all derived from one `TableEntries` sequence, so
//! callers must pass the same entries to every builder and to `entry_values`.

use serde::Serialize;
use serde_json::Value;
use sqlx::postgres::{PgArguments, Postgres};
use sqlx::query::{Query, QueryAs};
use sqlx::types::Json;
use std::collections::HashSet;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum EntryError {
    #[error("Missing data")]
    MissingData,

    #[error("No valid fields")]
    NoValidFields,

    #[error("Row {row} does not match the columns of the first row")]
    ColumnMismatch { row: usize },
}

/// A bindable column value
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    TextArray(Vec<String>),
    Json(Value),
}

impl From<Value> for SqlValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => SqlValue::Null,
            Value::Bool(b) => SqlValue::Bool(b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => SqlValue::Int(i),
                None => SqlValue::Float(n.as_f64().unwrap_or_default()),
            },
            Value::String(s) => SqlValue::Text(s),
            Value::Array(items) if items.iter().all(Value::is_string) => SqlValue::TextArray(
                items
                    .into_iter()
                    .filter_map(|item| match item {
                        Value::String(s) => Some(s),
                        _ => None,
                    })
                    .collect(),
            ),
            other => SqlValue::Json(other),
        }
    }
}

/// Ordered (column, value) pairs
pub type TableEntries = Vec<(String, SqlValue)>;

/// Immutable allow-list of writable columns for one table
#[derive(Debug, Clone)]
pub struct ColumnSet(HashSet<&'static str>);

impl ColumnSet {
    pub fn new(columns: &[&'static str]) -> Self {
        Self(columns.iter().copied().collect())
    }

    pub fn contains(&self, column: &str) -> bool {
        self.0.contains(column)
    }
}

/// Filter a record down to allow-listed, present fields
///
/// Fields serialized as absent (`Option::None` with `skip_serializing_if`)
/// are dropped; an explicit JSON `null` is kept as `SqlValue::Null`.
///
/// # Errors
/// * `EntryError::MissingData` when `data` is `None` or not an object
/// * `EntryError::NoValidFields` when nothing survives the filter
pub fn extract_valid_entries<T>(
    data: Option<&T>,
    allowed_columns: &ColumnSet,
) -> Result<TableEntries, EntryError>
where
    T: Serialize + ?Sized,
{
    let data = data.ok_or(EntryError::MissingData)?;
    let map = match serde_json::to_value(data) {
        Ok(Value::Object(map)) => map,
        _ => return Err(EntryError::MissingData),
    };

    let entries: TableEntries = map
        .into_iter()
        .filter(|(key, _)| allowed_columns.contains(key))
        .map(|(key, value)| (key, SqlValue::from(value)))
        .collect();

    if entries.is_empty() {
        return Err(EntryError::NoValidFields);
    }
    Ok(entries)
}

/// Quote an identifier, doubling embedded quotes
pub fn quote_identifier(column: &str) -> String {
    format!("\"{}\"", column.replace('"', "\"\""))
}

/// `"a", "b"`
pub fn build_insert_columns(entries: &TableEntries) -> String {
    entries
        .iter()
        .map(|(column, _)| quote_identifier(column))
        .collect::<Vec<_>>()
        .join(", ")
}

/// `$1, $2`
pub fn build_placeholders(entries: &TableEntries) -> String {
    numbered_placeholders(1, entries.len())
}

/// `count` markers starting at `$start`, for lists bound after other parameters
pub fn numbered_placeholders(start: usize, count: usize) -> String {
    (start..start + count)
        .map(|idx| format!("${}", idx))
        .collect::<Vec<_>>()
        .join(", ")
}

/// `"a" = $1, "b" = $2`
pub fn build_update_clauses(entries: &TableEntries) -> String {
    entries
        .iter()
        .enumerate()
        .map(|(idx, (column, _))| format!("{} = ${}", quote_identifier(column), idx + 1))
        .collect::<Vec<_>>()
        .join(", ")
}

/// `($1, $2), ($3, $4)` for a multi-row insert
///
/// Every row must list the same columns, in the same order, as the first
/// row; the column list itself comes from `build_insert_columns(&rows[0])`.
pub fn build_bulk_placeholders(rows: &[TableEntries]) -> Result<String, EntryError> {
    let first = rows.first().ok_or(EntryError::NoValidFields)?;
    let width = first.len();

    for (row_index, row) in rows.iter().enumerate().skip(1) {
        let same_columns = row.len() == width
            && row
                .iter()
                .zip(first.iter())
                .all(|((column, _), (expected, _))| column == expected);
        if !same_columns {
            return Err(EntryError::ColumnMismatch { row: row_index });
        }
    }

    Ok(rows
        .iter()
        .enumerate()
        .map(|(row_index, _)| {
            let markers = (1..=width)
                .map(|column_index| format!("${}", row_index * width + column_index))
                .collect::<Vec<_>>()
                .join(", ");
            format!("({})", markers)
        })
        .collect::<Vec<_>>()
        .join(", "))
}

/// Values in entry order, ready for positional binding
pub fn entry_values(entries: &TableEntries) -> Vec<SqlValue> {
    entries.iter().map(|(_, value)| value.clone()).collect()
}

macro_rules! bind_each {
    ($query:expr, $values:expr) => {{
        let mut query = $query;
        for value in $values {
            query = match value {
                // NULLs travel as untyped text; nullable non-text columns are cleared by omission.
                SqlValue::Null => query.bind(None::<String>),
                SqlValue::Bool(b) => query.bind(b),
                SqlValue::Int(i) => query.bind(i),
                SqlValue::Float(f) => query.bind(f),
                SqlValue::Text(s) => query.bind(s),
                SqlValue::TextArray(items) => query.bind(items),
                SqlValue::Json(v) => query.bind(Json(v)),
            };
        }
        query
    }};
}

/// Bind values positionally onto a row-mapping query
pub fn bind_query_as<'q, O>(
    query: QueryAs<'q, Postgres, O, PgArguments>,
    values: Vec<SqlValue>,
) -> QueryAs<'q, Postgres, O, PgArguments> {
    bind_each!(query, values)
}

/// Bind values positionally onto an execute-only query
pub fn bind_query<'q>(
    query: Query<'q, Postgres, PgArguments>,
    values: Vec<SqlValue>,
) -> Query<'q, Postgres, PgArguments> {
    bind_each!(query, values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    #[derive(Serialize)]
    struct UserRow<'a> {
        email: &'a str,
        name: &'a str,
        #[serde(skip_serializing_if = "Option::is_none")]
        picture_url: Option<&'a str>,
    }

    fn user_columns() -> ColumnSet {
        ColumnSet::new(&["email", "name", "picture_url"])
    }

    fn sample_entries() -> TableEntries {
        vec![
            ("email".to_string(), SqlValue::Text("test@gmail.com".to_string())),
            ("name".to_string(), SqlValue::Text("test name".to_string())),
            (
                "picture_url".to_string(),
                SqlValue::Text("https://image-test.png".to_string()),
            ),
        ]
    }

    #[test]
    fn test_extract_keeps_allowed_keys_in_order() {
        let row = UserRow {
            email: "test@gmail.com",
            name: "test name",
            picture_url: Some("https://image-test.png"),
        };

        let entries = extract_valid_entries(Some(&row), &user_columns()).unwrap();
        assert_eq!(entries, sample_entries());
    }

    #[test]
    fn test_extract_drops_unknown_and_absent_fields() {
        let data = serde_json::json!({
            "name": "n",
            "role": "admin",
            "email": "a@b.com",
        });
        let row = UserRow {
            email: "a@b.com",
            name: "n",
            picture_url: None,
        };

        let from_json = extract_valid_entries(Some(&data), &user_columns()).unwrap();
        let keys: Vec<&str> = from_json.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["name", "email"]);

        let from_struct = extract_valid_entries(Some(&row), &user_columns()).unwrap();
        assert_eq!(from_struct.len(), 2);
        assert!(from_struct.iter().all(|(k, _)| k != "picture_url"));
    }

    #[test]
    fn test_extract_keeps_explicit_null() {
        let data = serde_json::json!({ "picture_url": null });
        let entries = extract_valid_entries(Some(&data), &user_columns()).unwrap();
        assert_eq!(entries, vec![("picture_url".to_string(), SqlValue::Null)]);
    }

    #[test]
    fn test_extract_missing_data() {
        let result = extract_valid_entries::<UserRow>(None, &user_columns());
        assert_eq!(result, Err(EntryError::MissingData));

        let null = Value::Null;
        let result = extract_valid_entries(Some(&null), &user_columns());
        assert_eq!(result, Err(EntryError::MissingData));
    }

    #[test]
    fn test_extract_no_valid_fields() {
        let data = serde_json::json!({ "role": "admin" });
        let result = extract_valid_entries(Some(&data), &user_columns());
        assert_eq!(result, Err(EntryError::NoValidFields));
    }

    #[test]
    fn test_extract_is_idempotent() {
        let data = serde_json::json!({ "email": "a@b.com", "name": "n", "x": 1 });
        let first = extract_valid_entries(Some(&data), &user_columns()).unwrap();
        let second = extract_valid_entries(Some(&data), &user_columns()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_builders_align_with_entries() {
        let entries = vec![
            ("email".to_string(), SqlValue::Text("a@b.com".to_string())),
            ("name".to_string(), SqlValue::Text("n".to_string())),
        ];

        assert_eq!(build_insert_columns(&entries), r#""email", "name""#);
        assert_eq!(build_placeholders(&entries), "$1, $2");
        assert_eq!(build_update_clauses(&entries), r#""email" = $1, "name" = $2"#);
        assert_eq!(
            entry_values(&entries),
            vec![
                SqlValue::Text("a@b.com".to_string()),
                SqlValue::Text("n".to_string())
            ]
        );
    }

    #[test]
    fn test_three_column_fragments() {
        let entries = sample_entries();
        assert_eq!(
            build_insert_columns(&entries),
            r#""email", "name", "picture_url""#
        );
        assert_eq!(build_placeholders(&entries), "$1, $2, $3");
        assert_eq!(
            build_update_clauses(&entries),
            r#""email" = $1, "name" = $2, "picture_url" = $3"#
        );
    }

    #[test]
    fn test_identifier_quotes_are_doubled() {
        let entries = vec![("we\"ird".to_string(), SqlValue::Int(1))];
        assert_eq!(build_insert_columns(&entries), r#""we""ird""#);
        assert_eq!(build_update_clauses(&entries), r#""we""ird" = $1"#);
    }

    #[test]
    fn test_numbered_placeholders() {
        assert_eq!(numbered_placeholders(2, 3), "$2, $3, $4");
        assert_eq!(numbered_placeholders(1, 1), "$1");
        assert_eq!(numbered_placeholders(1, 0), "");
    }

    #[test]
    fn test_bulk_placeholders() {
        let row = |name: &str| {
            vec![
                ("common_name".to_string(), SqlValue::Text(name.to_string())),
                ("is_custom".to_string(), SqlValue::Bool(false)),
            ]
        };
        let rows = vec![row("a"), row("b")];
        assert_eq!(
            build_bulk_placeholders(&rows).unwrap(),
            "($1, $2), ($3, $4)"
        );
    }

    #[test]
    fn test_bulk_placeholders_reject_mismatched_rows() {
        let rows = vec![
            vec![("a".to_string(), SqlValue::Int(1))],
            vec![("b".to_string(), SqlValue::Int(2))],
        ];
        assert_eq!(
            build_bulk_placeholders(&rows),
            Err(EntryError::ColumnMismatch { row: 1 })
        );
        assert_eq!(build_bulk_placeholders(&[]), Err(EntryError::NoValidFields));
    }

    #[test]
    fn test_value_conversion() {
        assert_eq!(SqlValue::from(serde_json::json!(7)), SqlValue::Int(7));
        assert_eq!(SqlValue::from(serde_json::json!(1.5)), SqlValue::Float(1.5));
        assert_eq!(
            SqlValue::from(serde_json::json!(["full sun", "part shade"])),
            SqlValue::TextArray(vec!["full sun".to_string(), "part shade".to_string()])
        );
        assert!(matches!(
            SqlValue::from(serde_json::json!({ "k": 1 })),
            SqlValue::Json(_)
        ));
    }
}
