//! The user model and its database operations.

use email_address::EmailAddress;
use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};

use crate::{Error, auth::PasswordHash, database_id::DatabaseId};

/// Database identifier for a user.
///
/// Every stored record carries the ID of its owning user and every query is
/// scoped by it.
pub type UserId = DatabaseId;

/// A registered account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// The user's ID in the database.
    pub id: UserId,
    /// The email address the user signs in with.
    pub email: EmailAddress,
    /// The user's hashed password.
    pub password_hash: PasswordHash,
}

/// Create a user and return it with its generated ID.
///
/// # Errors
/// This function will return an:
/// - [Error::DuplicateEmail] if a user with `email` already exists,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_user(
    email: EmailAddress,
    password_hash: PasswordHash,
    connection: &Connection,
) -> Result<User, Error> {
    connection.execute(
        "INSERT INTO user (email, password) VALUES (?1, ?2);",
        (email.to_string(), password_hash.to_string()),
    )?;

    let id = connection.last_insert_rowid();

    Ok(User {
        id,
        email,
        password_hash,
    })
}

/// Retrieve the user that signs in with `email`.
///
/// # Errors
/// This function will return an:
/// - [Error::NotFound] if no user has the given email,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn get_user_by_email(email: &str, connection: &Connection) -> Result<User, Error> {
    connection
        .prepare("SELECT id, email, password FROM user WHERE email = :email;")?
        .query_one(&[(":email", &email)], map_user_row)
        .map_err(|error| error.into())
}

/// Retrieve a single user by ID.
///
/// # Errors
/// This function will return an:
/// - [Error::NotFound] if `user_id` does not refer to a valid user,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn get_user_by_id(user_id: UserId, connection: &Connection) -> Result<User, Error> {
    connection
        .prepare("SELECT id, email, password FROM user WHERE id = :id;")?
        .query_one(&[(":id", &user_id)], map_user_row)
        .map_err(|error| error.into())
}

/// Initialize the user table.
pub fn create_user_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS user (
            id INTEGER PRIMARY KEY,
            email TEXT NOT NULL UNIQUE,
            password TEXT NOT NULL
        );",
        (),
    )?;

    Ok(())
}

fn map_user_row(row: &Row) -> Result<User, rusqlite::Error> {
    let id = row.get(0)?;
    let raw_email: String = row.get(1)?;
    let email = raw_email
        .parse()
        .map_err(|_| rusqlite::Error::InvalidQuery)?;
    let raw_password_hash: String = row.get(2)?;
    let password_hash = PasswordHash::new_unchecked(&raw_password_hash);

    Ok(User {
        id,
        email,
        password_hash,
    })
}
