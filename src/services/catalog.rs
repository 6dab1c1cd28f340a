//! Book catalog service: listing, rating updates, deletion and creation

use std::sync::Arc;

use serde_json::Value;

use crate::{
    error::{AppError, AppResult},
    models::book::{
        coerce_rating, Book, BookCreated, BookDeleted, BookPage, NewBook, RatingUpdated,
        BOOKS_PER_SHELF,
    },
    repository::{BookStore, StoreResult},
};

/// Slice the id-ordered catalog to the half-open window
/// `[(page - 1) * 8, page * 8)`. Pages outside the catalog, including
/// pages below 1, give an empty slice.
pub fn paginate(books: Vec<Book>, page: i64) -> Vec<Book> {
    let Some(skip) = page
        .checked_sub(1)
        .and_then(|p| usize::try_from(p).ok())
        .and_then(|p| p.checked_mul(BOOKS_PER_SHELF))
    else {
        return Vec::new();
    };

    books.into_iter().skip(skip).take(BOOKS_PER_SHELF).collect()
}

#[derive(Clone)]
pub struct BookCatalogService {
    store: Arc<dyn BookStore>,
}

impl BookCatalogService {
    pub fn new(store: Arc<dyn BookStore>) -> Self {
        Self { store }
    }

    /// Page of the catalog plus the total count. An empty page is reported as not found.
    pub async fn list_books(&self, page: i64) -> AppResult<BookPage> {
        let (books, total_books) = self
            .shelf(page)
            .await
            .map_err(|e| AppError::Internal(e.to_string()))?;

        if books.is_empty() {
            return Err(AppError::NotFound(format!("page {} is empty", page)));
        }

        Ok(BookPage {
            success: true,
            books,
            total_books,
        })
    }

    /// Set the rating of a book from a `{"rating": ...}` body.
    /// A body without `rating` leaves the book untouched.
    pub async fn update_rating(&self, id: i32, body: &Value) -> AppResult<RatingUpdated> {
        let mut book = self
            .store
            .find_by_id(id)
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?
            .ok_or_else(|| AppError::NotFound(format!("Book {} not found", id)))?;

        let fields = body
            .as_object()
            .ok_or_else(|| AppError::BadRequest("body must be a JSON object".to_string()))?;

        if let Some(raw) = fields.get("rating") {
            let rating = coerce_rating(raw).map_err(|e| AppError::BadRequest(e.to_string()))?;
            book.rating = Some(rating);
        }

        self.store
            .update(&book)
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?;

        tracing::info!(book_id = id, rating = ?book.rating, "Book rating updated");

        Ok(RatingUpdated { success: true })
    }

    /// Remove a book and return the requested page of what remains
    pub async fn delete_book(&self, id: i32, page: i64) -> AppResult<BookDeleted> {
        let book = self
            .store
            .find_by_id(id)
            .await
            .map_err(|e| AppError::Unprocessable(e.to_string()))?
            .ok_or_else(|| AppError::NotFound(format!("Book {} not found", id)))?;

        self.store
            .delete(&book)
            .await
            .map_err(|e| AppError::Unprocessable(e.to_string()))?;

        let (books, total_books) = self
            .shelf(page)
            .await
            .map_err(|e| AppError::Unprocessable(e.to_string()))?;

        tracing::info!(book_id = id, total_books, "Book deleted");

        Ok(BookDeleted {
            success: true,
            deleted: id,
            books,
            total_books,
        })
    }

    /// Insert a book built from the `title`, `author` and `rating` body fields
    /// and return the requested page of the updated catalog
    pub async fn create_book(&self, body: &Value, page: i64) -> AppResult<BookCreated> {
        let fields = body
            .as_object()
            .ok_or_else(|| AppError::BadRequest("body must be a JSON object".to_string()))?;

        let new_book =
            NewBook::from_fields(fields).map_err(|e| AppError::Unprocessable(e.to_string()))?;

        let created = self
            .store
            .insert(new_book)
            .await
            .map_err(|e| AppError::Unprocessable(e.to_string()))?;

        let (books, total_books) = self
            .shelf(page)
            .await
            .map_err(|e| AppError::Unprocessable(e.to_string()))?;

        tracing::info!(book_id = created.id, total_books, "Book created");

        Ok(BookCreated {
            success: true,
            created: created.id,
            books,
            total_books,
        })
    }

    /// Store round trip used by the readiness probe
    pub async fn ping(&self) -> AppResult<i64> {
        self.store
            .count()
            .await
            .map_err(|e| AppError::Internal(e.to_string()))
    }

    async fn shelf(&self, page: i64) -> StoreResult<(Vec<Book>, i64)> {
        let books = paginate(self.store.list_all().await?, page);
        let total = self.store.count().await?;
        Ok((books, total))
    }
}
