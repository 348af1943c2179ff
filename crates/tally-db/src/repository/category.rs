//! # Category Repository
//!
//! Database operations for categories.
//!
//! ## Aggregates
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  categories                 items                                       │
//! │  ┌────┬─────────┐           ┌────────┬──────┬──────┬─────────────┐     │
//! │  │ id │ name    │           │ name   │ need │ have │ category_id │     │
//! │  ├────┼─────────┤  LEFT     ├────────┼──────┼──────┼─────────────┤     │
//! │  │ 1  │ Kitchen │◄──JOIN────│ Forks  │  10  │  4   │ 1           │     │
//! │  │    │         │           │ Plates │   6  │  6   │ 1           │     │
//! │  │ 2  │ Garage  │           └────────┴──────┴──────┴─────────────┘     │
//! │  └────┴─────────┘                                                       │
//! │                                                                         │
//! │  GROUP BY category → Kitchen: needed 16, inventory 10                  │
//! │                      Garage:  needed  0, inventory  0 (COALESCE)       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use sqlx::SqliteConnection;
use tally_core::{pagination, Category, RESULTS_PER_PAGE};

use super::log_statement;
use crate::error::DbResult;

const FIND_SQL: &str = r#"
    SELECT categories.id, categories.name,
           COALESCE(SUM(items.num_need), 0) AS needed_count,
           COALESCE(SUM(items.num_have), 0) AS inventory_count
    FROM categories
    LEFT OUTER JOIN items ON categories.id = items.category_id
    WHERE categories.id = ?1
    GROUP BY categories.id, categories.name
"#;

const PAGE_SQL: &str = r#"
    SELECT categories.id, categories.name,
           COALESCE(SUM(items.num_need), 0) AS needed_count,
           COALESCE(SUM(items.num_have), 0) AS inventory_count
    FROM categories
    LEFT OUTER JOIN items ON categories.id = items.category_id
    GROUP BY categories.id, categories.name
    ORDER BY LOWER(categories.name), categories.id
    LIMIT ?1 OFFSET ?2
"#;

/// Repository for category database operations.
///
/// ## Usage
/// ```rust,ignore
/// let mut storage = db.acquire().await?;
///
/// let id = storage.categories().create("Kitchen").await?;
/// let first_page = storage.categories().page(0).await?;
/// ```
#[derive(Debug)]
pub struct CategoryRepository<'c> {
    conn: &'c mut SqliteConnection,
}

impl<'c> CategoryRepository<'c> {
    /// Creates a repository on a borrowed connection.
    pub fn new(conn: &'c mut SqliteConnection) -> Self {
        CategoryRepository { conn }
    }

    /// Gets a category with its need/have totals.
    ///
    /// ## Returns
    /// * `Ok(Some(Category))` - Category found
    /// * `Ok(None)` - No category has this id
    pub async fn find(&mut self, id: i64) -> DbResult<Option<Category>> {
        log_statement(FIND_SQL, &[&id]);

        let category = sqlx::query_as::<_, Category>(FIND_SQL)
            .bind(id)
            .fetch_optional(&mut *self.conn)
            .await?;

        Ok(category)
    }

    /// Lists one page of categories, ordered by name ignoring case.
    ///
    /// ## Arguments
    /// * `page` - 0-based page index, already bounds-checked
    pub async fn page(&mut self, page: u64) -> DbResult<Vec<Category>> {
        let offset = pagination::offset(page);
        log_statement(PAGE_SQL, &[&RESULTS_PER_PAGE, &offset]);

        let categories = sqlx::query_as::<_, Category>(PAGE_SQL)
            .bind(RESULTS_PER_PAGE)
            .bind(offset)
            .fetch_all(&mut *self.conn)
            .await?;

        Ok(categories)
    }

    /// Lists every category name (for counting and uniqueness checks).
    pub async fn names(&mut self) -> DbResult<Vec<String>> {
        const SQL: &str = "SELECT name FROM categories";
        log_statement(SQL, &[]);

        let names = sqlx::query_scalar::<_, String>(SQL)
            .fetch_all(&mut *self.conn)
            .await?;

        Ok(names)
    }

    /// Lists every category name except the one with `id`.
    ///
    /// Used when renaming, so a category may keep its own name.
    pub async fn names_except(&mut self, id: i64) -> DbResult<Vec<String>> {
        const SQL: &str = "SELECT name FROM categories WHERE id <> ?1";
        log_statement(SQL, &[&id]);

        let names = sqlx::query_scalar::<_, String>(SQL)
            .bind(id)
            .fetch_all(&mut *self.conn)
            .await?;

        Ok(names)
    }

    /// Inserts a category and returns its generated id.
    pub async fn create(&mut self, name: &str) -> DbResult<i64> {
        const SQL: &str = "INSERT INTO categories (name) VALUES (?1)";
        log_statement(SQL, &[&name]);

        let result = sqlx::query(SQL)
            .bind(name)
            .execute(&mut *self.conn)
            .await?;

        Ok(result.last_insert_rowid())
    }

    /// Renames a category. Unknown ids are a no-op.
    pub async fn rename(&mut self, id: i64, name: &str) -> DbResult<()> {
        const SQL: &str = "UPDATE categories SET name = ?1 WHERE id = ?2";
        log_statement(SQL, &[&name, &id]);

        sqlx::query(SQL)
            .bind(name)
            .bind(id)
            .execute(&mut *self.conn)
            .await?;

        Ok(())
    }

    /// Deletes a category. Its items go with it (`ON DELETE CASCADE`).
    pub async fn delete(&mut self, id: i64) -> DbResult<()> {
        const SQL: &str = "DELETE FROM categories WHERE id = ?1";
        log_statement(SQL, &[&id]);

        sqlx::query(SQL).bind(id).execute(&mut *self.conn).await?;

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
