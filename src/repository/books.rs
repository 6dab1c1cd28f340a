//! PostgreSQL book store

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use super::{BookStore, StoreError, StoreResult};
use crate::models::book::{Book, NewBook};

#[derive(Clone)]
pub struct PgBookStore {
    pool: Pool<Postgres>,
}

impl PgBookStore {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookStore for PgBookStore {
    async fn list_all(&self) -> StoreResult<Vec<Book>> {
        let rows = sqlx::query_as::<_, Book>(
            "SELECT id, title, author, rating FROM books ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn find_by_id(&self, id: i32) -> StoreResult<Option<Book>> {
        let row = sqlx::query_as::<_, Book>(
            "SELECT id, title, author, rating FROM books WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn insert(&self, book: NewBook) -> StoreResult<Book> {
        let row = sqlx::query_as::<_, Book>(
            r#"
            INSERT INTO books (title, author, rating)
            VALUES ($1, $2, $3)
            RETURNING id, title, author, rating
            "#,
        )
        .bind(&book.title)
        .bind(&book.author)
        .bind(book.rating)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn update(&self, book: &Book) -> StoreResult<()> {
        let result = sqlx::query(
            "UPDATE books SET title = $2, author = $3, rating = $4 WHERE id = $1",
        )
        .bind(book.id)
        .bind(&book.title)
        .bind(&book.author)
        .bind(book.rating)
        .execute(&self.pool)
        .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::Missing(book.id));
        }
        Ok(())
    }

    async fn delete(&self, book: &Book) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(book.id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::Missing(book.id));
        }
        Ok(())
    }

    async fn count(&self) -> StoreResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
