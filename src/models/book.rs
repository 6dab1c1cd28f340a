//! Book model and the JSON envelopes returned by the book endpoints

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sqlx::FromRow;
use thiserror::Error;
use utoipa::{IntoParams, ToSchema};

/// Number of books on one page of a listing
pub const BOOKS_PER_SHELF: usize = 8;

/// Book record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    /// Assigned by the store, never reused
    pub id: i32,
    pub title: Option<String>,
    pub author: Option<String>,
    pub rating: Option<i32>,
}

/// Fields of a book that does not have an id yet
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewBook {
    pub title: Option<String>,
    pub author: Option<String>,
    pub rating: Option<i32>,
}

/// A body field whose JSON type does not fit the `books` column
#[derive(Debug, Error, PartialEq, Eq)]
#[error("field `{field}` cannot be stored from {found}")]
pub struct FieldTypeError {
    pub field: &'static str,
    pub found: &'static str,
}

impl NewBook {
    /// Build a book from a request body the way the `books` columns take
    /// assignments. Absent and `null` fields are stored as null; text columns
    /// take any scalar as its text; the integer column takes integers, floats
    /// rounded to the nearest integer and strings holding an integer. Arrays,
    /// objects and anything else the column would refuse are rejected.
    pub fn from_fields(body: &Map<String, Value>) -> Result<Self, FieldTypeError> {
        Ok(Self {
            title: text_field(body, "title")?,
            author: text_field(body, "author")?,
            rating: integer_field(body, "rating")?,
        })
    }
}

fn text_field(
    body: &Map<String, Value>,
    field: &'static str,
) -> Result<Option<String>, FieldTypeError> {
    match body.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(Value::Bool(b)) => Ok(Some(b.to_string())),
        Some(other) => Err(FieldTypeError {
            field,
            found: json_type(other),
        }),
    }
}

fn integer_field(
    body: &Map<String, Value>,
    field: &'static str,
) -> Result<Option<i32>, FieldTypeError> {
    let value = match body.get(field) {
        None | Some(Value::Null) => return Ok(None),
        Some(value) => value,
    };

    let assigned = match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(rounded)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };

    assigned
        .and_then(|n| i32::try_from(n).ok())
        .map(Some)
        .ok_or(FieldTypeError {
            field,
            found: json_type(value),
        })
}

fn rounded(f: f64) -> Option<i64> {
    let r = f.round();
    (r.is_finite() && r >= i64::MIN as f64 && r <= i64::MAX as f64).then(|| r as i64)
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("rating must be an integer, got {0}")]
pub struct RatingError(pub String);

/// Coerce a `rating` value the way a lenient integer conversion does:
/// integers pass through, floats truncate toward zero, booleans become 0/1
/// and strings must hold an integer (surrounding whitespace allowed).
pub fn coerce_rating(value: &Value) -> Result<i32, RatingError> {
    let coerced = match value {
        Value::Bool(b) => Some(i64::from(*b)),
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite())
                .map(|f| f.trunc())
                .filter(|f| *f >= i64::MIN as f64 && *f <= i64::MAX as f64)
                .map(|f| f as i64)
        }),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };

    coerced
        .and_then(|n| i32::try_from(n).ok())
        .ok_or_else(|| RatingError(value.to_string()))
}

/// `page` query parameter
#[derive(Debug, Default, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    /// 1-based page number (default: 1)
    pub page: Option<String>,
}

impl PageQuery {
    /// Pick `page` out of the raw query pairs; when it repeats, the first one wins.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        Self {
            page: pairs
                .into_iter()
                .find_map(|(key, value)| (key == "page").then_some(value)),
        }
    }

    /// Requested page; missing or unparsable values mean the first page.
    pub fn page(&self) -> i64 {
        self.page
            .as_deref()
            .and_then(|p| p.trim().parse().ok())
            .unwrap_or(1)
    }
}

/// One page of the catalog
#[derive(Debug, Serialize, ToSchema)]
pub struct BookPage {
    pub success: bool,
    pub books: Vec<Book>,
    /// Number of books in the whole catalog
    pub total_books: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RatingUpdated {
    pub success: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BookDeleted {
    pub success: bool,
    /// Id of the removed book
    pub deleted: i32,
    pub books: Vec<Book>,
    pub total_books: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BookCreated {
    pub success: bool,
    /// Id assigned to the new book
    pub created: i32,
    pub books: Vec<Book>,
    pub total_books: i64,
}

/// Create book request, as documented in the OpenAPI schema
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateBook {
    pub title: Option<String>,
    pub author: Option<String>,
    pub rating: Option<i32>,
}

/// Update rating request, as documented in the OpenAPI schema
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateRating {
    pub rating: Option<i32>,
}
