//! Category repository contract and SQLite implementation.
//!
//! Dates are stored as ISO `YYYY-MM-DD` text through rusqlite's chrono
//! support.

use super::{
    delete_cascading, ensure_connection_ready, stale_write_error, EntityKind, RepoResult,
    ARTWORKS_SHAPE, CATEGORIES_SHAPE,
};
use crate::model::category::{Category, CategoryId, NewCategory};
use rusqlite::{params, Connection, OptionalExtension, Row};

const CATEGORY_SELECT_SQL: &str = "SELECT
    category_id,
    name,
    date_created,
    row_version
FROM categories";

pub trait CategoryRepository {
    fn create_category(&self, category: &NewCategory) -> RepoResult<CategoryId>;
    fn get_category(&self, id: CategoryId) -> RepoResult<Option<Category>>;
    /// All categories ordered by id.
    fn list_categories(&self) -> RepoResult<Vec<Category>>;
    fn replace_category(&self, category: &Category) -> RepoResult<Category>;
    /// Deletes the category and every artwork filed under it.
    fn delete_category(&self, id: CategoryId) -> RepoResult<usize>;
}

pub struct SqliteCategoryRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCategoryRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, &[CATEGORIES_SHAPE, ARTWORKS_SHAPE])?;
        Ok(Self { conn })
    }
}

impl CategoryRepository for SqliteCategoryRepository<'_> {
    fn create_category(&self, category: &NewCategory) -> RepoResult<CategoryId> {
        self.conn.execute(
            "INSERT INTO categories (name, date_created) VALUES (?1, ?2);",
            params![category.name, category.date_created],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn get_category(&self, id: CategoryId) -> RepoResult<Option<Category>> {
        let category = self
            .conn
            .query_row(
                &format!("{CATEGORY_SELECT_SQL} WHERE category_id = ?1;"),
                [id],
                parse_category_row,
            )
            .optional()?;
        Ok(category)
    }

    fn list_categories(&self) -> RepoResult<Vec<Category>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{CATEGORY_SELECT_SQL} ORDER BY category_id ASC;"))?;
        let categories = stmt
            .query_map([], parse_category_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(categories)
    }

    fn replace_category(&self, category: &Category) -> RepoResult<Category> {
        let changed = self.conn.execute(
            "UPDATE categories
             SET
                name = ?1,
                date_created = ?2,
                row_version = row_version + 1
             WHERE category_id = ?3
               AND row_version = ?4;",
            params![
                category.name,
                category.date_created,
                category.category_id,
                category.row_version,
            ],
        )?;

        if changed == 0 {
            return Err(stale_write_error(
                self.conn,
                EntityKind::Category,
                category.category_id,
                category.row_version,
            ));
        }

        Ok(Category {
            row_version: category.row_version + 1,
            ..category.clone()
        })
    }

    fn delete_category(&self, id: CategoryId) -> RepoResult<usize> {
        delete_cascading(self.conn, EntityKind::Category, id)
    }
}

fn parse_category_row(row: &Row<'_>) -> rusqlite::Result<Category> {
    Ok(Category {
        category_id: row.get("category_id")?,
        name: row.get("name")?,
        date_created: row.get("date_created")?,
        row_version: row.get("row_version")?,
    })
}
