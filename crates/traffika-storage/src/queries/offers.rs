// SPDX-FileCopyrightText: 2026 Traffika Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Offer CRUD operations.

use rusqlite::params;
use traffika_core::{NewOffer, Offer, OfferField, TraffikaError};

use crate::database::Database;

const OFFER_COLUMNS: &str = "id, name, description, payout, geo, vertical, kpi, tracker, \
                             antifraud, created_at, attribution_app_id, attribution_event, \
                             daily_limit";

fn offer_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Offer> {
    Ok(Offer {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        payout: row.get(3)?,
        geo: row.get(4)?,
        vertical: row.get(5)?,
        kpi: row.get(6)?,
        tracker: row.get(7)?,
        antifraud: row.get(8)?,
        created_at: row.get(9)?,
        attribution_app_id: row.get(10)?,
        attribution_event: row.get(11)?,
        daily_limit: row.get(12)?,
    })
}

/// Insert one offer row. Returns the store-assigned id.
pub async fn create_offer(db: &Database, offer: &NewOffer) -> Result<i64, TraffikaError> {
    let offer = offer.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO offers (name, description, payout, geo, vertical, kpi, tracker, \
                 antifraud, attribution_app_id, attribution_event, daily_limit)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
                params![
                    offer.name,
                    offer.description,
                    offer.payout,
                    offer.geo,
                    offer.vertical,
                    offer.kpi,
                    offer.tracker,
                    offer.antifraud,
                    offer.attribution_app_id,
                    offer.attribution_event,
                    offer.daily_limit,
                ],
            )?;
            Ok(conn.last_insert_rowid())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// All offers, oldest first.
pub async fn list_offers(db: &Database) -> Result<Vec<Offer>, TraffikaError> {
    db.connection()
        .call(|conn| {
            let mut stmt =
                conn.prepare(&format!("SELECT {OFFER_COLUMNS} FROM offers ORDER BY id"))?;
            let rows = stmt.query_map([], offer_from_row)?;
            let mut offers = Vec::new();
            for row in rows {
                offers.push(row?);
            }
            Ok(offers)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Get an offer by id, `None` if absent.
pub async fn get_offer(db: &Database, id: i64) -> Result<Option<Offer>, TraffikaError> {
    db.connection()
        .call(move |conn| {
            let mut stmt =
                conn.prepare(&format!("SELECT {OFFER_COLUMNS} FROM offers WHERE id = ?1"))?;
            let result = stmt.query_row(params![id], offer_from_row);
            match result {
                Ok(offer) => Ok(Some(offer)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Update a single column. The column name comes from the closed
/// [`OfferField`] enum, never from raw input. Returns rows affected.
pub async fn update_offer_field(
    db: &Database,
    id: i64,
    field: OfferField,
    value: traffika_core::FieldValue,
) -> Result<u64, TraffikaError> {
    let value = super::bind_value(value);
    db.connection()
        .call(move |conn| {
            let affected = conn.execute(
                &format!("UPDATE offers SET {} = ?1 WHERE id = ?2", field.column()),
                params![value, id],
            )?;
            Ok(affected as u64)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Delete an offer. Returns rows affected (0 for an unknown id).
pub async fn delete_offer(db: &Database, id: i64) -> Result<u64, TraffikaError> {
    db.connection()
        .call(move |conn| {
            let affected = conn.execute("DELETE FROM offers WHERE id = ?1", params![id])?;
            Ok(affected as u64)
        })
        .await
        .map_err(crate::database::map_tr_err)
}
