//! Database operations for user-created categories.

use rusqlite::{Connection, Row};

use crate::{
    Error,
    auth::UserId,
    category::{Category, CategoryColor, CategoryName},
    database_id::CategoryId,
    transaction::TransactionKind,
};

/// Create a category and return it with its generated ID.
pub fn create_category(
    name: CategoryName,
    kind: TransactionKind,
    color: CategoryColor,
    user_id: UserId,
    connection: &Connection,
) -> Result<Category, Error> {
    connection.execute(
        "INSERT INTO category (name, kind, color, user_id) VALUES (?1, ?2, ?3, ?4);",
        (name.as_ref(), kind, color.as_str(), user_id),
    )?;

    let id = connection.last_insert_rowid();

    Ok(Category {
        id,
        name,
        kind,
        color,
        user_id,
    })
}

/// Retrieve all of a user's categories in insertion order.
pub fn get_categories_by_user(
    user_id: UserId,
    connection: &Connection,
) -> Result<Vec<Category>, Error> {
    connection
        .prepare(
            "SELECT id, name, kind, color, user_id FROM category
             WHERE user_id = :user_id ORDER BY id;",
        )?
        .query_map(&[(":user_id", &user_id)], map_category_row)?
        .map(|maybe_category| maybe_category.map_err(|error| error.into()))
        .collect()
}

/// Delete a user's category by ID. Returns an error if the category doesn't exist.
///
/// Built-in categories never reach this function since they carry no ID.
pub fn delete_category(
    category_id: CategoryId,
    user_id: UserId,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "DELETE FROM category WHERE id = ?1 AND user_id = ?2",
        (category_id, user_id),
    )?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingCategory);
    }

    Ok(())
}

/// Initialize the category table and indexes.
pub fn create_category_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS category (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            kind TEXT NOT NULL,
            color TEXT NOT NULL,
            user_id INTEGER NOT NULL,
            FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_category_user ON category(user_id);",
    )?;

    Ok(())
}

fn map_category_row(row: &Row) -> Result<Category, rusqlite::Error> {
    let id = row.get(0)?;
    let raw_name: String = row.get(1)?;
    let name = CategoryName::new_unchecked(&raw_name);
    let kind = row.get(2)?;
    let raw_color: String = row.get(3)?;
    let color = raw_color
        .parse()
        .map_err(|_| rusqlite::Error::InvalidQuery)?;
    let user_id = row.get(4)?;

    Ok(Category {
        id,
        name,
        kind,
        color,
        user_id,
    })
}

#[cfg(test)]
mod category_query_tests {
    use rusqlite::Connection;

    use crate::{
        Error,
        auth::UserId,
        category::{CategoryColor, CategoryName, create_category, get_categories_by_user},
        db::initialize,
        transaction::TransactionKind,
    };

    use super::delete_category;

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

    fn create_test_category(
        name: &str,
        kind: TransactionKind,
        user_id: UserId,
        connection: &Connection,
    ) -> crate::category::Category {
        let name = CategoryName::new_unchecked(name);
        let color = CategoryColor::assign(&name);

        create_category(name, kind, color, user_id, connection)
            .expect("Could not create test category")
    }

    #[test]
    fn create_category_succeeds() {
        let (connection, user_id) = get_test_db_connection();

        let category =
            create_test_category("Coffee", TransactionKind::Expense, user_id, &connection);

        assert!(category.id > 0);
        assert_eq!(category.name.as_ref(), "Coffee");
        assert_eq!(category.kind, TransactionKind::Expense);
        assert_eq!(category.user_id, user_id);
    }

    #[test]
    fn get_categories_returns_insertion_order() {
        let (connection, user_id) = get_test_db_connection();
        create_test_category("Coffee", TransactionKind::Expense, user_id, &connection);
        create_test_category("Gym", TransactionKind::Expense, user_id, &connection);
        create_test_category("Dividends", TransactionKind::Income, user_id, &connection);

        let categories = get_categories_by_user(user_id, &connection).unwrap();

        let names: Vec<_> = categories
            .iter()
            .map(|category| category.name.as_ref())
            .collect();
        assert_eq!(names, vec!["Coffee", "Gym", "Dividends"]);
    }

    #[test]
    fn get_categories_excludes_other_users() {
        let (connection, user_id) = get_test_db_connection();
        connection
            .execute(
                "INSERT INTO user (email, password) VALUES ('other@bar.baz', 'hunter3')",
                (),
            )
            .unwrap();
        let other_user_id = connection.last_insert_rowid();
        create_test_category("Coffee", TransactionKind::Expense, other_user_id, &connection);

        let categories = get_categories_by_user(user_id, &connection).unwrap();

        assert!(categories.is_empty());
    }

    #[test]
    fn delete_category_succeeds() {
        let (connection, user_id) = get_test_db_connection();
        let category =
            create_test_category("ToDelete", TransactionKind::Expense, user_id, &connection);

        let result = delete_category(category.id, user_id, &connection);

        assert!(result.is_ok());
        assert!(get_categories_by_user(user_id, &connection)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn delete_category_with_invalid_id_returns_not_found() {
        let (connection, user_id) = get_test_db_connection();

        let result = delete_category(999999, user_id, &connection);

        assert_eq!(result, Err(Error::DeleteMissingCategory));
    }

    #[test]
    fn delete_category_ignores_other_users() {
        let (connection, user_id) = get_test_db_connection();
        let category =
            create_test_category("Coffee", TransactionKind::Expense, user_id, &connection);

        let result = delete_category(category.id, user_id + 1, &connection);

        assert_eq!(result, Err(Error::DeleteMissingCategory));
        assert_eq!(get_categories_by_user(user_id, &connection).unwrap().len(), 1);
    }
}
