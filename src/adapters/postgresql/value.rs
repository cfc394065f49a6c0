//! Conversion between [`SqlValue`] and PostgreSQL wire types
//!
//! PostgreSQL rejects a parameter whose Rust type does not match the column
//! type exactly (an `i64` cannot be bound to an `INT4`), so parameters are
//! converted against the types the server reports for the prepared statement.

use crate::anonymization::transforms::date::parse_date_text;
use crate::domain::{Result, Row, SqlValue, VeilError};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use tokio_postgres::types::{ToSql, Type};
use uuid::Uuid;

/// Boxed parameter ready to pass to `tokio_postgres`
pub type PgParam = Box<dyn ToSql + Sync + Send>;

fn mismatch(value: &SqlValue, ty: &Type) -> VeilError {
    VeilError::Database(format!(
        "Cannot bind {} value '{}' to a {} parameter",
        value.kind(),
        value,
        ty.name()
    ))
}

fn int_param(value: &SqlValue, ty: &Type, n: i64) -> Result<PgParam> {
    let param: PgParam = match *ty {
        Type::INT2 => Box::new(i16::try_from(n).map_err(|_| mismatch(value, ty))?),
        Type::INT4 => Box::new(i32::try_from(n).map_err(|_| mismatch(value, ty))?),
        _ => Box::new(n),
    };
    Ok(param)
}

fn null_param(ty: &Type) -> PgParam {
    match *ty {
        Type::BOOL => Box::new(None::<bool>),
        Type::INT2 => Box::new(None::<i16>),
        Type::INT4 => Box::new(None::<i32>),
        Type::INT8 => Box::new(None::<i64>),
        Type::FLOAT4 => Box::new(None::<f32>),
        Type::FLOAT8 => Box::new(None::<f64>),
        Type::DATE => Box::new(None::<NaiveDate>),
        Type::TIMESTAMP => Box::new(None::<NaiveDateTime>),
        Type::TIMESTAMPTZ => Box::new(None::<DateTime<Utc>>),
        Type::UUID => Box::new(None::<Uuid>),
        Type::NUMERIC => Box::new(None::<Decimal>),
        _ => Box::new(None::<String>),
    }
}

/// Convert a value into a parameter of the given PostgreSQL type
///
/// # Errors
///
/// Returns [`VeilError::Database`] when the value cannot be represented in
/// the target type.
pub fn to_param(value: &SqlValue, ty: &Type) -> Result<PgParam> {
    let param: PgParam = match (value, ty) {
        (SqlValue::Null, _) => null_param(ty),

        (SqlValue::Int(n), &Type::INT2 | &Type::INT4 | &Type::INT8) => int_param(value, ty, *n)?,
        (SqlValue::Bool(b), &Type::BOOL) => Box::new(*b),
        (SqlValue::Float(f), &Type::FLOAT4) => Box::new(*f as f32),
        (SqlValue::Float(f), &Type::FLOAT8) => Box::new(*f),
        (SqlValue::Int(n), &Type::FLOAT8) => Box::new(*n as f64),

        (SqlValue::Date(d), &Type::DATE) => Box::new(*d),
        (SqlValue::Timestamp(ts), &Type::DATE) => Box::new(ts.date()),
        (SqlValue::Text(s), &Type::DATE) => {
            Box::new(parse_date_text(s).ok_or_else(|| mismatch(value, ty))?)
        }
        (SqlValue::Timestamp(ts), &Type::TIMESTAMP) => Box::new(*ts),
        (SqlValue::Date(d), &Type::TIMESTAMP) => Box::new(d.and_time(chrono::NaiveTime::MIN)),
        (SqlValue::Timestamp(ts), &Type::TIMESTAMPTZ) => {
            Box::new(DateTime::<Utc>::from_naive_utc_and_offset(*ts, Utc))
        }

        // UUID and NUMERIC columns are read as text, see `from_pg_row`
        (SqlValue::Text(s), &Type::UUID) => {
            Box::new(Uuid::parse_str(s).map_err(|_| mismatch(value, ty))?)
        }
        (SqlValue::Text(s), &Type::NUMERIC) => {
            Box::new(Decimal::from_str_exact(s.trim()).map_err(|_| mismatch(value, ty))?)
        }
        (SqlValue::Int(n), &Type::NUMERIC) => Box::new(Decimal::from(*n)),

        (SqlValue::Text(s), _) => Box::new(s.clone()),
        (SqlValue::Int(_) | SqlValue::Float(_) | SqlValue::Date(_) | SqlValue::Timestamp(_), t)
            if is_text_type(t) =>
        {
            Box::new(value.to_string())
        }

        _ => return Err(mismatch(value, ty)),
    };
    Ok(param)
}

fn is_text_type(ty: &Type) -> bool {
    matches!(
        *ty,
        Type::TEXT | Type::VARCHAR | Type::BPCHAR | Type::NAME | Type::UNKNOWN
    )
}

fn decode_err(column: &str, err: tokio_postgres::Error) -> VeilError {
    VeilError::Database(format!("Failed to decode column '{column}': {err}"))
}

/// Convert a driver row into a [`Row`], keeping column order
///
/// `UUID` and `NUMERIC` columns become [`SqlValue::Text`] and bind back
/// through [`to_param`]. `NUMERIC` goes through [`Decimal`], so `NaN`,
/// the infinities and values past 28 significant digits fail to decode.
///
/// # Errors
///
/// Returns [`VeilError::Database`] for column types with no [`SqlValue`]
/// counterpart.
pub fn from_pg_row(row: &tokio_postgres::Row) -> Result<Row> {
    let mut out = Row::new();

    for (idx, column) in row.columns().iter().enumerate() {
        let name = column.name();
        let value = match *column.type_() {
            Type::BOOL => row
                .try_get::<_, Option<bool>>(idx)
                .map(|v| v.map_or(SqlValue::Null, SqlValue::Bool)),
            Type::INT2 => row
                .try_get::<_, Option<i16>>(idx)
                .map(|v| v.map_or(SqlValue::Null, |n| SqlValue::Int(n.into()))),
            Type::INT4 => row
                .try_get::<_, Option<i32>>(idx)
                .map(|v| v.map_or(SqlValue::Null, |n| SqlValue::Int(n.into()))),
            Type::INT8 => row
                .try_get::<_, Option<i64>>(idx)
                .map(|v| v.map_or(SqlValue::Null, SqlValue::Int)),
            Type::FLOAT4 => row
                .try_get::<_, Option<f32>>(idx)
                .map(|v| v.map_or(SqlValue::Null, |f| SqlValue::Float(f.into()))),
            Type::FLOAT8 => row
                .try_get::<_, Option<f64>>(idx)
                .map(|v| v.map_or(SqlValue::Null, SqlValue::Float)),
            Type::DATE => row
                .try_get::<_, Option<NaiveDate>>(idx)
                .map(|v| v.map_or(SqlValue::Null, SqlValue::Date)),
            Type::TIMESTAMP => row
                .try_get::<_, Option<NaiveDateTime>>(idx)
                .map(|v| v.map_or(SqlValue::Null, SqlValue::Timestamp)),
            Type::TIMESTAMPTZ => row
                .try_get::<_, Option<DateTime<Utc>>>(idx)
                .map(|v| v.map_or(SqlValue::Null, |ts| SqlValue::Timestamp(ts.naive_utc()))),
            Type::UUID => row
                .try_get::<_, Option<Uuid>>(idx)
                .map(|v| v.map_or(SqlValue::Null, |id| SqlValue::Text(id.to_string()))),
            Type::NUMERIC => row
                .try_get::<_, Option<Decimal>>(idx)
                .map(|v| v.map_or(SqlValue::Null, |n| SqlValue::Text(n.to_string()))),
            _ => row
                .try_get::<_, Option<String>>(idx)
                .map(|v| v.map_or(SqlValue::Null, SqlValue::Text)),
        }
        .map_err(|e| decode_err(name, e))?;

        out.push(name, value);
    }

    Ok(out)
}
