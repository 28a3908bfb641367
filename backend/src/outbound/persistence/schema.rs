//! Diesel table definitions for the PostgreSQL schema.
//!
//! Keep in step with `backend/migrations`. The unique indexes on
//! `lower(subdomain)` and `lower(email)` are not visible here; see
//! [`super::diesel_error_mapping`] for how their violations are reported.

diesel::table! {
    /// Account owners.
    users (id) {
        id -> Uuid,
        name -> Varchar,
        /// Stored trimmed and lowercased.
        email -> Varchar,
        /// Argon2id PHC string.
        password_hash -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Tenant accounts, one per subdomain.
    accounts (id) {
        id -> Uuid,
        /// Stored lowercased.
        subdomain -> Varchar,
        owner_id -> Uuid,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(accounts -> users (owner_id));
diesel::allow_tables_to_appear_in_same_query!(accounts, users);
