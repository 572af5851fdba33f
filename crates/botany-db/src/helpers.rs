//! Column parsing helpers.
//!
//! The garden table is written by several tools with loose typing: `is_dead`
//! may be an integer, a real, or text, and `score` is occasionally text. These
//! helpers read a `libsql::Value` into the shape the row type expects.

use crate::error::DatabaseError;

/// Read a truthy flag column. NULL and empty text read as `false`.
///
/// # Errors
///
/// Returns `DatabaseError::Query` for text that is not a number or for blobs.
pub fn value_to_bool(value: &libsql::Value) -> Result<bool, DatabaseError> {
    match value {
        libsql::Value::Null => Ok(false),
        libsql::Value::Integer(v) => Ok(*v != 0),
        libsql::Value::Real(v) => Ok(*v != 0.0),
        libsql::Value::Text(s) if s.trim().is_empty() => Ok(false),
        libsql::Value::Text(s) => s
            .trim()
            .parse::<f64>()
            .map(|v| v != 0.0)
            .map_err(|e| DatabaseError::Query(format!("Invalid flag '{s}': {e}"))),
        libsql::Value::Blob(_) => Err(DatabaseError::Query("Invalid flag: blob".into())),
    }
}

/// Read an integer column leniently. NULL and unparseable text read as 0.
#[must_use]
pub fn value_to_i64(value: &libsql::Value) -> i64 {
    match value {
        libsql::Value::Integer(v) => *v,
        #[allow(clippy::cast_possible_truncation)]
        libsql::Value::Real(v) => v.trunc() as i64,
        libsql::Value::Text(s) => s.trim().parse().unwrap_or(0),
        libsql::Value::Null | libsql::Value::Blob(_) => 0,
    }
}

/// Read a nullable text column, rendering numbers as text.
#[must_use]
pub fn value_to_opt_string(value: &libsql::Value) -> Option<String> {
    match value {
        libsql::Value::Text(s) => Some(s.clone()),
        libsql::Value::Integer(v) => Some(v.to_string()),
        libsql::Value::Real(v) => Some(v.to_string()),
        libsql::Value::Null | libsql::Value::Blob(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use libsql::Value;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(Value::Null, false)]
    #[case(Value::Integer(0), false)]
    #[case(Value::Integer(1), true)]
    #[case(Value::Real(1.0), true)]
    #[case(Value::Text("0".into()), false)]
    #[case(Value::Text("1".into()), true)]
    #[case(Value::Text(String::new()), false)]
    fn flags_parse(#[case] value: Value, #[case] expected: bool) {
        assert_eq!(value_to_bool(&value).unwrap(), expected);
    }

    #[test]
    fn garbage_flag_is_an_error() {
        assert!(value_to_bool(&Value::Text("dead?".into())).is_err());
    }

    #[test]
    fn integers_parse_leniently() {
        assert_eq!(value_to_i64(&Value::Real(12.9)), 12);
        assert_eq!(value_to_i64(&Value::Text("40".into())), 40);
        assert_eq!(value_to_i64(&Value::Text("lots".into())), 0);
        assert_eq!(value_to_i64(&Value::Null), 0);
    }

    #[test]
    fn text_columns_render_numbers() {
        assert_eq!(value_to_opt_string(&Value::Integer(3)).as_deref(), Some("3"));
        assert_eq!(value_to_opt_string(&Value::Null), None);
    }
}
