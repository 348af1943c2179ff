//! # Item Repository
//!
//! Database operations for items.
//!
//! Item names are unique across the whole inventory, not per category, so
//! the name listings here come in three scopes: one category, all items,
//! and all items but one.

use sqlx::SqliteConnection;
use tally_core::{pagination, Item, RESULTS_PER_PAGE};

use super::log_statement;
use crate::error::DbResult;

const PAGE_SQL: &str = r#"
    SELECT id, name, num_need, num_have, category_id
    FROM items
    WHERE category_id = ?1
    ORDER BY LOWER(name), id
    LIMIT ?2 OFFSET ?3
"#;

/// Repository for item database operations.
#[derive(Debug)]
pub struct ItemRepository<'c> {
    conn: &'c mut SqliteConnection,
}

impl<'c> ItemRepository<'c> {
    /// Creates a repository on a borrowed connection.
    pub fn new(conn: &'c mut SqliteConnection) -> Self {
        ItemRepository { conn }
    }

    /// Gets an item by id. `Ok(None)` when no item has this id.
    pub async fn find(&mut self, id: i64) -> DbResult<Option<Item>> {
        const SQL: &str =
            "SELECT id, name, num_need, num_have, category_id FROM items WHERE id = ?1";
        log_statement(SQL, &[&id]);

        let item = sqlx::query_as::<_, Item>(SQL)
            .bind(id)
            .fetch_optional(&mut *self.conn)
            .await?;

        Ok(item)
    }

    /// Lists one page of a category's items, ordered by name ignoring case.
    pub async fn page_for_category(&mut self, category_id: i64, page: u64) -> DbResult<Vec<Item>> {
        let offset = pagination::offset(page);
        log_statement(PAGE_SQL, &[&category_id, &RESULTS_PER_PAGE, &offset]);

        let items = sqlx::query_as::<_, Item>(PAGE_SQL)
            .bind(category_id)
            .bind(RESULTS_PER_PAGE)
            .bind(offset)
            .fetch_all(&mut *self.conn)
            .await?;

        Ok(items)
    }

    /// Lists the item names of one category (for counting).
    pub async fn names_in_category(&mut self, category_id: i64) -> DbResult<Vec<String>> {
        const SQL: &str = "SELECT name FROM items WHERE category_id = ?1";
        log_statement(SQL, &[&category_id]);

        let names = sqlx::query_scalar::<_, String>(SQL)
            .bind(category_id)
            .fetch_all(&mut *self.conn)
            .await?;

        Ok(names)
    }

    /// Lists every item name in every category (for uniqueness of new items).
    pub async fn names(&mut self) -> DbResult<Vec<String>> {
        const SQL: &str = "SELECT name FROM items";
        log_statement(SQL, &[]);

        let names = sqlx::query_scalar::<_, String>(SQL)
            .fetch_all(&mut *self.conn)
            .await?;

        Ok(names)
    }

    /// Lists every item name except the item with `id` (for edits).
    pub async fn names_except(&mut self, id: i64) -> DbResult<Vec<String>> {
        const SQL: &str = "SELECT name FROM items WHERE id <> ?1";
        log_statement(SQL, &[&id]);

        let names = sqlx::query_scalar::<_, String>(SQL)
            .bind(id)
            .fetch_all(&mut *self.conn)
            .await?;

        Ok(names)
    }

    /// Adds an item to a category and returns its generated id.
    ///
    /// ## Returns
    /// * `Err(DbError::ForeignKeyViolation)` - Category no longer exists
    pub async fn create(
        &mut self,
        category_id: i64,
        name: &str,
        num_need: i64,
        num_have: i64,
    ) -> DbResult<i64> {
        const SQL: &str = r#"
            INSERT INTO items (name, num_need, num_have, category_id)
            VALUES (?1, ?2, ?3, ?4)
        "#;
        log_statement(SQL, &[&name, &num_need, &num_have, &category_id]);

        let result = sqlx::query(SQL)
            .bind(name)
            .bind(num_need)
            .bind(num_have)
            .bind(category_id)
            .execute(&mut *self.conn)
            .await?;

        Ok(result.last_insert_rowid())
    }

    /// Overwrites an item's name and quantities. Unknown ids are a no-op.
    pub async fn update(
        &mut self,
        id: i64,
        name: &str,
        num_need: i64,
        num_have: i64,
    ) -> DbResult<()> {
        const SQL: &str = r#"
            UPDATE items
            SET name = ?1, num_need = ?2, num_have = ?3
            WHERE id = ?4
        "#;
        log_statement(SQL, &[&name, &num_need, &num_have, &id]);

        sqlx::query(SQL)
            .bind(name)
            .bind(num_need)
            .bind(num_have)
            .bind(id)
            .execute(&mut *self.conn)
            .await?;

        Ok(())
    }

    /// Deletes a single item.
    pub async fn delete(&mut self, id: i64) -> DbResult<()> {
        const SQL: &str = "DELETE FROM items WHERE id = ?1";
        log_statement(SQL, &[&id]);

        sqlx::query(SQL).bind(id).execute(&mut *self.conn).await?;

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use tally_core::MAX_QUANTITY;

    use crate::error::DbError;
    use crate::repository::test_support::storage;

    #[tokio::test]
    async fn test_create_and_find() {
        let (_db, mut storage) = storage().await;

        let kitchen = storage.categories().create("Kitchen").await.unwrap();
        let id = storage.items().create(kitchen, "Forks", 10, 4).await.unwrap();

        let forks = storage.items().find(id).await.unwrap().unwrap();
        assert_eq!(forks.name, "Forks");
        assert_eq!(forks.num_need, 10);
        assert_eq!(forks.num_have, 4);
        assert_eq!(forks.category_id, kitchen);
        assert!(storage.items().find(id + 1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_page_for_category() {
        let (_db, mut storage) = storage().await;

        let kitchen = storage.categories().create("Kitchen").await.unwrap();
        let garage = storage.categories().create("Garage").await.unwrap();
        for name in ["spoons", "Forks", "cups", "Bowls", "plates", "Knives"] {
            storage.items().create(kitchen, name, 1, 0).await.unwrap();
        }
        storage.items().create(garage, "Apron", 1, 1).await.unwrap();

        let first: Vec<String> = storage
            .items()
            .page_for_category(kitchen, 0)
            .await
            .unwrap()
            .into_iter()
            .map(|i| i.name)
            .collect();
        assert_eq!(first, vec!["Bowls", "cups", "Forks", "Knives", "plates"]);

        let second = storage.items().page_for_category(kitchen, 1).await.unwrap();
        assert_eq!(second.len(), 1);
        assert_eq!(second[0].name, "spoons");
    }

    #[tokio::test]
    async fn test_name_scopes() {
        let (_db, mut storage) = storage().await;

        let kitchen = storage.categories().create("Kitchen").await.unwrap();
        let garage = storage.categories().create("Garage").await.unwrap();
        let forks = storage.items().create(kitchen, "Forks", 1, 0).await.unwrap();
        storage.items().create(garage, "Rake", 1, 0).await.unwrap();

        assert_eq!(
            storage.items().names_in_category(kitchen).await.unwrap(),
            vec!["Forks"]
        );
        assert_eq!(storage.items().names().await.unwrap().len(), 2);
        assert_eq!(
            storage.items().names_except(forks).await.unwrap(),
            vec!["Rake"]
        );
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let (_db, mut storage) = storage().await;

        let kitchen = storage.categories().create("Kitchen").await.unwrap();
        let id = storage.items().create(kitchen, "Forks", 10, 4).await.unwrap();

        storage.items().update(id, "Spoons", 8, 8).await.unwrap();
        let spoons = storage.items().find(id).await.unwrap().unwrap();
        assert_eq!((spoons.name.as_str(), spoons.num_need, spoons.num_have), ("Spoons", 8, 8));
        assert!(spoons.is_complete());

        storage.items().delete(id).await.unwrap();
        assert!(storage.items().find(id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_create_in_missing_category_fails() {
        let (_db, mut storage) = storage().await;

        let err = storage.items().create(42, "Forks", 1, 0).await.unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));
    }

    #[tokio::test]
    async fn test_quantity_above_limit_rejected() {
        let (_db, mut storage) = storage().await;

        let kitchen = storage.categories().create("Kitchen").await.unwrap();
        storage
            .items()
            .create(kitchen, "Forks", MAX_QUANTITY, 0)
            .await
            .unwrap();

        let err = storage
            .items()
            .create(kitchen, "Spoons", MAX_QUANTITY + 1, 0)
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::QueryFailed(ref msg) if msg.contains("CHECK")));
    }
}
