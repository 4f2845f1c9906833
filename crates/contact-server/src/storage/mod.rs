//! Storage layer
//!
//! SQLite (embedded) through sqlx. No in-process cache: every read hits the
//! database.

pub mod db;

pub use db::Database;
