//! Paginated row extraction
//!
//! Rows are read in primary-key order with an OFFSET/LIMIT walk. Rows inserted
//! or deleted by other writers during the scan can be skipped or read twice;
//! the pipeline assumes no concurrent writers on the table.

use crate::adapters::database::sql;
use crate::adapters::database::DatabaseClient;
use crate::domain::{Result, Row, SqlValue, VeilError};

/// One page of rows: key values and, per key, the target column values
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowBatch {
    keys: Vec<SqlValue>,
    rows: Vec<Row>,
}

impl RowBatch {
    pub fn primary_key_values(&self) -> &[SqlValue] {
        &self.keys
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// `(key, row)` pairs in key order
    pub fn iter(&self) -> impl Iterator<Item = (&SqlValue, &Row)> {
        self.keys.iter().zip(&self.rows)
    }

    fn push(&mut self, key: SqlValue, row: Row) {
        self.keys.push(key);
        self.rows.push(row);
    }
}

/// Split a fetched row into its key and the remaining columns
fn split_key(row: Row, primary_key: &str) -> Result<(SqlValue, Row)> {
    let key = row.get(primary_key).cloned().ok_or_else(|| {
        VeilError::Database(format!(
            "Primary key column '{primary_key}' missing from result row"
        ))
    })?;

    if key.is_null() {
        return Err(VeilError::Database(format!(
            "Primary key column '{primary_key}' is NULL"
        )));
    }

    let rest = row
        .iter()
        .filter(|(column, _)| *column != primary_key)
        .map(|(column, value)| (column.to_string(), value.clone()))
        .collect();

    Ok((key, rest))
}

/// Number of rows in `table`
pub async fn count_rows(db: &mut dyn DatabaseClient, table: &str) -> Result<u64> {
    let query = sql::count_sql(db.dialect(), table);
    let rows = db.execute_query(&query, &[]).await?;

    match rows.first().and_then(|row| row.iter().next()) {
        Some((_, SqlValue::Int(n))) => u64::try_from(*n)
            .map_err(|_| VeilError::Database(format!("Negative row count {n} for '{table}'"))),
        Some((_, SqlValue::Text(s))) => s
            .parse()
            .map_err(|_| VeilError::Database(format!("Invalid row count '{s}' for '{table}'"))),
        other => Err(VeilError::Database(format!(
            "Unexpected row count result for '{table}': {other:?}"
        ))),
    }
}

/// First row of `table` in key order, or `None` if the table is empty
pub async fn sample_row(
    db: &mut dyn DatabaseClient,
    table: &str,
    primary_key: &str,
    columns: &[String],
) -> Result<Option<(SqlValue, Row)>> {
    let query = sql::select_sample_sql(db.dialect(), table, primary_key, columns);
    let rows = db.execute_query(&query, &[]).await?;

    rows.into_iter()
        .next()
        .map(|row| split_key(row, primary_key))
        .transpose()
}

/// Read one page of `batch_size` rows starting at `offset`
///
/// An empty batch means the table is exhausted.
pub async fn read_batch(
    db: &mut dyn DatabaseClient,
    table: &str,
    primary_key: &str,
    columns: &[String],
    batch_size: usize,
    offset: u64,
) -> Result<RowBatch> {
    let query = sql::select_page_sql(db.dialect(), table, primary_key, columns);
    let params = [
        SqlValue::Int(batch_size as i64),
        SqlValue::Int(offset as i64),
    ];

    tracing::debug!(table = %table, offset, limit = batch_size, "Reading batch");
    let rows = db.execute_query(&query, &params).await?;

    let mut batch = RowBatch::default();
    for row in rows {
        let (key, rest) = split_key(row, primary_key)?;
        batch.push(key, rest);
    }
    Ok(batch)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_key_removes_key_column() {
        let row = Row::new()
            .with("id", 7i64)
            .with("email", "a@b.com")
            .with("phone", "555");

        let (key, rest) = split_key(row, "id").unwrap();
        assert_eq!(key, SqlValue::Int(7));
        assert_eq!(rest.column_names().collect::<Vec<_>>(), ["email", "phone"]);
    }

    #[test]
    fn test_split_key_missing_or_null_key() {
        let row = Row::new().with("email", "a@b.com");
        assert!(split_key(row, "id").is_err());

        let row = Row::new().with("id", SqlValue::Null).with("email", "a@b.com");
        assert!(split_key(row, "id").is_err());
    }
}
