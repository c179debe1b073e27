//! Storage for per-user preferences.
//!
//! Each user has at most one preference row. Writes use upsert-merge
//! semantics: only the written column is touched, anything else stored on
//! the row is preserved.

use rusqlite::Connection;

use crate::{Error, auth::UserId, currency::Currency};

/// Read the user's preferred display currency.
///
/// Falls back to the default currency when the user has not saved a
/// preference yet.
pub fn get_currency(user_id: UserId, connection: &Connection) -> Result<Currency, Error> {
    let code: Option<String> = connection
        .prepare("SELECT currency_code FROM preference WHERE user_id = :user_id;")?
        .query_row(&[(":user_id", &user_id)], |row| row.get(0))
        .map(Some)
        .or_else(|error| match error {
            rusqlite::Error::QueryReturnedNoRows => Ok(None),
            error => Err(error),
        })?;

    Ok(code
        .map(|code| Currency::from_code(&code))
        .unwrap_or_default())
}

/// Save the user's preferred display currency.
///
/// Creates the preference row if it does not exist yet, otherwise updates
/// only the currency column.
pub fn set_currency(
    user_id: UserId,
    currency: Currency,
    connection: &Connection,
) -> Result<(), Error> {
    connection.execute(
        "INSERT INTO preference (user_id, currency_code) VALUES (?1, ?2)
         ON CONFLICT(user_id) DO UPDATE SET currency_code = excluded.currency_code",
        (user_id, currency.code()),
    )?;

    Ok(())
}

/// Initialize the preference table.
pub fn create_preference_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS preference (
            user_id INTEGER PRIMARY KEY,
            currency_code TEXT NOT NULL,
            FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
        );",
        (),
    )?;

    Ok(())
}

#[cfg(test)]
mod preference_tests {
    use rusqlite::Connection;

    use crate::{auth::UserId, currency::Currency, db::initialize};

    use super::{get_currency, set_currency};

    fn get_test_db_connection() -> (Connection, UserId) {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).expect("Could not initialize database");
        connection
            .execute(
                "INSERT INTO user (email, password) VALUES ('foo@bar.baz', 'hunter2')",
                (),
            )
            .unwrap();
        let user_id = connection.last_insert_rowid();

        (connection, user_id)
    }

    #[test]
    fn missing_preference_defaults_to_usd() {
        let (connection, user_id) = get_test_db_connection();

        let currency = get_currency(user_id, &connection).unwrap();

        assert_eq!(currency, Currency::Usd);
    }

    #[test]
    fn set_currency_round_trips() {
        let (connection, user_id) = get_test_db_connection();

        set_currency(user_id, Currency::Khr, &connection).unwrap();

        assert_eq!(get_currency(user_id, &connection).unwrap(), Currency::Khr);
    }

    #[test]
    fn set_currency_overwrites_previous_value() {
        let (connection, user_id) = get_test_db_connection();

        set_currency(user_id, Currency::Khr, &connection).unwrap();
        set_currency(user_id, Currency::Usd, &connection).unwrap();

        assert_eq!(get_currency(user_id, &connection).unwrap(), Currency::Usd);

        let row_count: i64 = connection
            .query_row("SELECT COUNT(user_id) FROM preference", [], |row| row.get(0))
            .unwrap();
        assert_eq!(row_count, 1, "the preference row is a singleton per user");
    }

    #[test]
    fn unknown_stored_code_falls_back_to_default() {
        let (connection, user_id) = get_test_db_connection();
        connection
            .execute(
                "INSERT INTO preference (user_id, currency_code) VALUES (?1, 'XYZ')",
                [user_id],
            )
            .unwrap();

        assert_eq!(get_currency(user_id, &connection).unwrap(), Currency::Usd);
    }

    #[test]
    fn preferences_are_scoped_per_user() {
        let (connection, user_id) = get_test_db_connection();
        connection
            .execute(
                "INSERT INTO user (email, password) VALUES ('other@bar.baz', 'hunter3')",
                (),
            )
            .unwrap();
        let other_user_id = connection.last_insert_rowid();

        set_currency(user_id, Currency::Khr, &connection).unwrap();

        assert_eq!(
            get_currency(other_user_id, &connection).unwrap(),
            Currency::Usd
        );
    }
}
