//! Internal Diesel row structs for the account tables.
//!
//! These types never leave the persistence layer.

use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{accounts, users};

/// Insertable owner row.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub name: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
}

/// Insertable account row.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = accounts)]
pub(crate) struct NewAccountRow<'a> {
    pub id: Uuid,
    pub subdomain: &'a str,
    pub owner_id: Uuid,
}

/// Account row as read back from storage.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = accounts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct AccountRow {
    pub id: Uuid,
    pub subdomain: String,
    pub owner_id: Uuid,
}
