//! Database initialization.

use rusqlite::Connection;

use crate::user_store::create_user_table;

/// Create the application's tables if they do not exist.
///
/// # Errors
///
/// This function will return an error if a SQL query failed.
pub fn initialize(connection: &Connection) -> Result<(), rusqlite::Error> {
    create_user_table(connection)
}
