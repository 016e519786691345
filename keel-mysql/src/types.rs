//! Conversions between Keel values and MySQL wire values.

use keel_query::{Row, RowError, Value, ValueError};
use mysql_async::Value as MysqlValue;

/// Convert a Keel value to a MySQL parameter.
pub fn to_mysql(value: &Value) -> MysqlValue {
    match value {
        Value::Null => MysqlValue::NULL,
        Value::Bool(b) => MysqlValue::Int(i64::from(*b)),
        Value::Int(i) => MysqlValue::Int(*i),
        Value::Float(f) => MysqlValue::Double(*f),
        Value::String(s) => MysqlValue::Bytes(s.as_bytes().to_vec()),
        Value::Bytes(b) => MysqlValue::Bytes(b.clone()),
    }
}

/// Convert a MySQL result value to a Keel value.
///
/// Unsigned integers above `i64::MAX` cannot be represented and fail.
pub fn from_mysql(value: MysqlValue) -> Result<Value, ValueError> {
    Ok(match value {
        MysqlValue::NULL => Value::Null,
        MysqlValue::Int(i) => Value::Int(i),
        MysqlValue::UInt(u) => Value::Int(i64::try_from(u).map_err(|_| ValueError {
            expected: "i64",
            found: "unsigned integer",
        })?),
        MysqlValue::Float(f) => Value::Float(f64::from(f)),
        MysqlValue::Double(d) => Value::Float(d),
        MysqlValue::Bytes(bytes) => match String::from_utf8(bytes) {
            Ok(s) => Value::String(s),
            Err(e) => Value::Bytes(e.into_bytes()),
        },
        MysqlValue::Date(year, month, day, hour, minute, second, micro) => Value::String(format!(
            "{:04}-{:02}-{:02} {:02}:{:02}:{:02}.{:06}",
            year, month, day, hour, minute, second, micro
        )),
        MysqlValue::Time(is_neg, days, hours, minutes, seconds, micro) => {
            let sign = if is_neg { "-" } else { "" };
            Value::String(format!(
                "{}{}:{:02}:{:02}.{:06}",
                sign,
                days * 24 + u32::from(hours),
                minutes,
                seconds,
                micro
            ))
        }
    })
}

/// Materialize a driver row as an ordered column mapping.
pub fn convert_row(row: &mysql_async::Row) -> Result<Row, RowError> {
    let mut out = Row::new();
    for (i, column) in row.columns_ref().iter().enumerate() {
        let name = column.name_str();
        let value: Option<MysqlValue> = row.get(i);
        let value =
            from_mysql(value.unwrap_or(MysqlValue::NULL)).map_err(|e| RowError::conversion(name.as_ref(), e))?;
        out.insert(name.into_owned(), value);
    }
    Ok(out)
}
