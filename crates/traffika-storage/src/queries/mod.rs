// SPDX-FileCopyrightText: 2026 Traffika Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed query modules, one per table.

pub mod offers;
pub mod sources;
pub mod users;

use rusqlite::types::Value;
use traffika_core::FieldValue;

/// Convert a validated field value into a SQLite value for binding.
pub(crate) fn bind_value(value: FieldValue) -> Value {
    match value {
        FieldValue::Text(s) => Value::Text(s),
        FieldValue::Number(n) => Value::Real(n),
        FieldValue::Integer(i) => Value::Integer(i),
    }
}
