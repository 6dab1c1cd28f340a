//! In-process book store

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{BookStore, StoreError, StoreResult};
use crate::models::book::{Book, NewBook};

#[derive(Debug)]
struct Shelf {
    books: BTreeMap<i32, Book>,
    /// `None` once `i32::MAX` has been handed out
    next_id: Option<i32>,
}

/// Books kept in an ordered map. Ids come from a counter that only moves
/// forward, so a deleted id is never handed out again.
#[derive(Debug)]
pub struct MemoryBookStore {
    shelf: RwLock<Shelf>,
}

impl MemoryBookStore {
    pub fn new() -> Self {
        Self {
            shelf: RwLock::new(Shelf::default()),
        }
    }

    /// Store pre-filled with `books`, assigned ids 1..=n in order.
    /// Books past the last assignable id are dropped.
    pub fn with_books(books: impl IntoIterator<Item = NewBook>) -> Self {
        let mut shelf = Shelf::default();
        for book in books {
            if shelf.place(book).is_err() {
                break;
            }
        }
        Self {
            shelf: RwLock::new(shelf),
        }
    }
}

impl Default for MemoryBookStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Default for Shelf {
    fn default() -> Self {
        Self {
            books: BTreeMap::new(),
            next_id: Some(1),
        }
    }
}

impl Shelf {
    fn place(&mut self, book: NewBook) -> StoreResult<Book> {
        let id = self.next_id.ok_or(StoreError::IdsExhausted)?;
        self.next_id = id.checked_add(1);
        let book = Book {
            id,
            title: book.title,
            author: book.author,
            rating: book.rating,
        };
        self.books.insert(id, book.clone());
        Ok(book)
    }
}

#[async_trait]
impl BookStore for MemoryBookStore {
    async fn list_all(&self) -> StoreResult<Vec<Book>> {
        Ok(self.shelf.read().await.books.values().cloned().collect())
    }

    async fn find_by_id(&self, id: i32) -> StoreResult<Option<Book>> {
        Ok(self.shelf.read().await.books.get(&id).cloned())
    }

    async fn insert(&self, book: NewBook) -> StoreResult<Book> {
        self.shelf.write().await.place(book)
    }

    async fn update(&self, book: &Book) -> StoreResult<()> {
        let mut shelf = self.shelf.write().await;
        match shelf.books.get_mut(&book.id) {
            Some(stored) => {
                *stored = book.clone();
                Ok(())
            }
            None => Err(StoreError::Missing(book.id)),
        }
    }

    async fn delete(&self, book: &Book) -> StoreResult<()> {
        self.shelf
            .write()
            .await
            .books
            .remove(&book.id)
            .map(|_| ())
            .ok_or(StoreError::Missing(book.id))
    }

    async fn count(&self) -> StoreResult<i64> {
        Ok(self.shelf.read().await.books.len() as i64)
    }
}
