// SPDX-FileCopyrightText: 2026 Traffika Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Traffic source CRUD operations.

use rusqlite::params;
use traffika_core::{NewTrafficSource, SourceField, TraffikaError, TrafficSource};

use crate::database::Database;

const SOURCE_COLUMNS: &str = "id, name, conversion, cost, capacity, geo, performance, created_at";

fn source_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<TrafficSource> {
    Ok(TrafficSource {
        id: row.get(0)?,
        name: row.get(1)?,
        conversion: row.get(2)?,
        cost: row.get(3)?,
        capacity: row.get(4)?,
        geo: row.get(5)?,
        performance: row.get(6)?,
        created_at: row.get(7)?,
    })
}

/// Insert one traffic source row. Returns the store-assigned id.
pub async fn create_source(
    db: &Database,
    source: &NewTrafficSource,
) -> Result<i64, TraffikaError> {
    let source = source.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO sources (name, conversion, cost, capacity, geo, performance)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    source.name,
                    source.conversion,
                    source.cost,
                    source.capacity,
                    source.geo,
                    source.performance,
                ],
            )?;
            Ok(conn.last_insert_rowid())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// All traffic sources, oldest first.
pub async fn list_sources(db: &Database) -> Result<Vec<TrafficSource>, TraffikaError> {
    db.connection()
        .call(|conn| {
            let mut stmt =
                conn.prepare(&format!("SELECT {SOURCE_COLUMNS} FROM sources ORDER BY id"))?;
            let rows = stmt.query_map([], source_from_row)?;
            let mut sources = Vec::new();
            for row in rows {
                sources.push(row?);
            }
            Ok(sources)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Get a traffic source by id, `None` if absent.
pub async fn get_source(db: &Database, id: i64) -> Result<Option<TrafficSource>, TraffikaError> {
    db.connection()
        .call(move |conn| {
            let mut stmt =
                conn.prepare(&format!("SELECT {SOURCE_COLUMNS} FROM sources WHERE id = ?1"))?;
            let result = stmt.query_row(params![id], source_from_row);
            match result {
                Ok(source) => Ok(Some(source)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Update a single column. The column name comes from the closed
/// [`SourceField`] enum, never from raw input. Returns rows affected.
pub async fn update_source_field(
    db: &Database,
    id: i64,
    field: SourceField,
    value: traffika_core::FieldValue,
) -> Result<u64, TraffikaError> {
    let value = super::bind_value(value);
    db.connection()
        .call(move |conn| {
            let affected = conn.execute(
                &format!("UPDATE sources SET {} = ?1 WHERE id = ?2", field.column()),
                params![value, id],
            )?;
            Ok(affected as u64)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Delete a traffic source. Returns rows affected (0 for an unknown id).
pub async fn delete_source(db: &Database, id: i64) -> Result<u64, TraffikaError> {
    db.connection()
        .call(move |conn| {
            let affected = conn.execute("DELETE FROM sources WHERE id = ?1", params![id])?;
            Ok(affected as u64)
        })
        .await
        .map_err(crate::database::map_tr_err)
}
