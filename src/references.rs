use tracing::debug;

use crate::db::{RecordStore, Statement, Table};
use crate::error::StoreError;

/// Number of rows in `table` whose `column` equals `id`.
///
/// Read-only. A missing id counts as zero.
pub async fn count_references<S: RecordStore>(
    store: &mut S,
    table: Table,
    column: &str,
    id: &str,
) -> Result<u64, StoreError> {
    let statement = Statement::count_where(table, column, id)?;
    let rows = store.query(&statement).await?;

    let count = match rows.first() {
        Some(row) => u64::try_from(row.integer("total")?).unwrap_or(0),
        None => 0,
    };
    debug!(table = table.name(), column, id, count, "reference count");

    Ok(count)
}
