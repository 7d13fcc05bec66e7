//! Diesel model definitions for the relational item table
//!
//! - Queryable structs: for SELECT queries (reading data)
//! - Insertable structs: for INSERT queries (writing data)

use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use super::diesel_schema::item;

/// Item row from SELECT query, serialized as-is in list responses
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Serialize, Deserialize)]
#[diesel(table_name = item)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct SqlItem {
    pub id: i32,
    pub name: String,
    pub description: String,
}

/// New item for INSERT
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = item)]
pub struct NewSqlItem<'a> {
    pub name: &'a str,
    pub description: &'a str,
}
