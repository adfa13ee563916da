// SPDX-FileCopyrightText: 2026 Traffika Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! User and role operations.

use std::str::FromStr;

use rusqlite::params;
use tracing::warn;
use traffika_core::{Role, TraffikaError};

use crate::database::Database;

/// Role lookup. Unknown users and unparseable role strings default to
/// [`Role::Partner`].
pub async fn user_role(db: &Database, user_id: i64) -> Result<Role, TraffikaError> {
    let stored: Option<String> = db
        .connection()
        .call(move |conn| {
            let result = conn.query_row(
                "SELECT role FROM users WHERE user_id = ?1",
                params![user_id],
                |row| row.get(0),
            );
            match result {
                Ok(role) => Ok(Some(role)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)?;

    Ok(stored
        .and_then(|s| Role::from_str(&s).ok())
        .unwrap_or(Role::Partner))
}

/// Idempotent update-by-username. Returns whether any row was affected.
pub async fn set_user_role(
    db: &Database,
    username: &str,
    role: Role,
) -> Result<bool, TraffikaError> {
    let username = username.to_string();
    let affected = db
        .connection()
        .call(move |conn| {
            let affected = conn.execute(
                "UPDATE users SET role = ?1 WHERE username = ?2",
                params![role.to_string(), username],
            )?;
            Ok(affected)
        })
        .await
        .map_err(crate::database::map_tr_err)?;
    Ok(affected > 0)
}

/// Create a user row. A duplicate-identity conflict is swallowed and
/// logged, leaving the existing row untouched.
pub async fn create_user(
    db: &Database,
    user_id: i64,
    username: &str,
    role: Role,
) -> Result<(), TraffikaError> {
    let username_owned = username.to_string();
    let inserted = db
        .connection()
        .call(move |conn| {
            let affected = conn.execute(
                "INSERT OR IGNORE INTO users (user_id, username, role) VALUES (?1, ?2, ?3)",
                params![user_id, username_owned, role.to_string()],
            )?;
            Ok(affected)
        })
        .await
        .map_err(crate::database::map_tr_err)?;

    if inserted == 0 {
        warn!(user_id, username, "user already exists");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    async fn setup_db() -> (Database, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("users.db");
        let db = Database::open(db_path.to_str().unwrap()).await.unwrap();
        (db, dir)
    }

    #[tokio::test]
    async fn unknown_user_defaults_to_partner() {
        let (db, _dir) = setup_db().await;
        assert_eq!(user_role(&db, 555).await.unwrap(), Role::Partner);
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn create_user_and_read_role_back() {
        let (db, _dir) = setup_db().await;
        create_user(&db, 1, "boss", Role::Admin).await.unwrap();
        assert_eq!(user_role(&db, 1).await.unwrap(), Role::Admin);
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn duplicate_create_keeps_first_row() {
        let (db, _dir) = setup_db().await;
        create_user(&db, 1, "boss", Role::Admin).await.unwrap();
        // Second insert with the same identity must not replace the row.
        create_user(&db, 1, "impostor", Role::Partner).await.unwrap();
        assert_eq!(user_role(&db, 1).await.unwrap(), Role::Admin);
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn set_user_role_reports_affected_rows() {
        let (db, _dir) = setup_db().await;
        create_user(&db, 2, "partner_kate", Role::Partner)
            .await
            .unwrap();

        assert!(set_user_role(&db, "partner_kate", Role::Admin).await.unwrap());
        assert_eq!(user_role(&db, 2).await.unwrap(), Role::Admin);

        // Unknown username affects nothing.
        assert!(!set_user_role(&db, "nobody", Role::Admin).await.unwrap());
        db.close().await.unwrap();
    }
}
