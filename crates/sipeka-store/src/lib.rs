//! # sipeka-store
//!
//! Local storage for the SiPeka client, backed by SQLite.
//!
//! The only state the client keeps between runs is the login token, held in
//! a small key-value table. The crate exposes a synchronous `Database`
//! handle wrapping a `rusqlite::Connection`, typed key-value helpers, and
//! [`SqliteSession`], the persistent implementation of the
//! [`Session`](sipeka_shared::Session) capability.

pub mod database;
pub mod kv;
pub mod migrations;
pub mod session;

mod error;

pub use database::Database;
pub use error::StoreError;
pub use session::SqliteSession;
