use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use stratum_core::{
    data::{DataValue, Row},
    err::{bail, Context, Result},
};
use tokio_postgres::types::{FromSql, Kind, Type};
use uuid::Uuid;

/// Decodes every cell of a postgres row
pub fn from_pg_row(row: &tokio_postgres::Row) -> Result<Row> {
    row.columns()
        .iter()
        .enumerate()
        .map(|(idx, col)| -> Result<(String, DataValue)> {
            let value = from_pg(row, idx, col.type_())
                .with_context(|| format!("Failed to decode column '{}'", col.name()))?;

            Ok((col.name().to_string(), value))
        })
        .collect()
}

/// Decodes the cell at `idx` of the supplied postgres type
pub fn from_pg(row: &tokio_postgres::Row, idx: usize, r#type: &Type) -> Result<DataValue> {
    if let Kind::Array(inner) = r#type.kind() {
        return from_pg_array(row, idx, inner);
    }

    Ok(match *r#type {
        Type::TEXT | Type::VARCHAR | Type::BPCHAR | Type::NAME | Type::UNKNOWN => {
            get(row, idx, DataValue::Utf8String)?
        }
        Type::BYTEA => get(row, idx, DataValue::Binary)?,
        Type::BOOL => get(row, idx, DataValue::Boolean)?,
        Type::CHAR => get(row, idx, DataValue::Int8)?,
        Type::INT2 => get(row, idx, DataValue::Int16)?,
        Type::INT4 => get(row, idx, DataValue::Int32)?,
        Type::INT8 => get(row, idx, DataValue::Int64)?,
        Type::OID => get(row, idx, DataValue::UInt32)?,
        Type::NUMERIC => get(row, idx, DataValue::Decimal)?,
        Type::FLOAT4 => get(row, idx, DataValue::Float32)?,
        Type::FLOAT8 => get(row, idx, DataValue::Float64)?,
        Type::JSON | Type::JSONB => get(row, idx, |v: serde_json::Value| {
            DataValue::JSON(v.to_string())
        })?,
        Type::DATE => get(row, idx, DataValue::Date)?,
        Type::TIME => get(row, idx, DataValue::Time)?,
        Type::TIMESTAMP => get(row, idx, DataValue::DateTime)?,
        Type::TIMESTAMPTZ => get(row, idx, DataValue::DateTimeWithTZ)?,
        Type::UUID => get(row, idx, DataValue::Uuid)?,
        _ => bail!("Postgres type {} is not supported", r#type),
    })
}

fn from_pg_array(row: &tokio_postgres::Row, idx: usize, inner: &Type) -> Result<DataValue> {
    Ok(match *inner {
        Type::TEXT | Type::VARCHAR | Type::BPCHAR | Type::NAME => {
            get_list(row, idx, DataValue::Utf8String)?
        }
        Type::BOOL => get_list(row, idx, DataValue::Boolean)?,
        Type::INT2 => get_list(row, idx, DataValue::Int16)?,
        Type::INT4 => get_list(row, idx, DataValue::Int32)?,
        Type::INT8 => get_list(row, idx, DataValue::Int64)?,
        Type::NUMERIC => get_list::<Decimal>(row, idx, DataValue::Decimal)?,
        Type::FLOAT4 => get_list(row, idx, DataValue::Float32)?,
        Type::FLOAT8 => get_list(row, idx, DataValue::Float64)?,
        Type::DATE => get_list::<NaiveDate>(row, idx, DataValue::Date)?,
        Type::TIME => get_list::<NaiveTime>(row, idx, DataValue::Time)?,
        Type::TIMESTAMP => get_list::<NaiveDateTime>(row, idx, DataValue::DateTime)?,
        Type::TIMESTAMPTZ => {
            get_list::<DateTime<FixedOffset>>(row, idx, DataValue::DateTimeWithTZ)?
        }
        Type::UUID => get_list::<Uuid>(row, idx, DataValue::Uuid)?,
        _ => bail!("Postgres array of type {} is not supported", inner),
    })
}

fn get<'a, T: FromSql<'a>>(
    row: &'a tokio_postgres::Row,
    idx: usize,
    f: impl FnOnce(T) -> DataValue,
) -> Result<DataValue> {
    Ok(row
        .try_get::<_, Option<T>>(idx)?
        .map(f)
        .unwrap_or(DataValue::Null))
}

fn get_list<'a, T: FromSql<'a>>(
    row: &'a tokio_postgres::Row,
    idx: usize,
    f: impl Fn(T) -> DataValue,
) -> Result<DataValue> {
    Ok(match row.try_get::<_, Option<Vec<Option<T>>>>(idx)? {
        Some(items) => DataValue::List(
            items
                .into_iter()
                .map(|i| i.map(&f).unwrap_or(DataValue::Null))
                .collect(),
        ),
        None => DataValue::Null,
    })
}
