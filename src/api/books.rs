//! Book endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};
use axum_extra::extract::WithRejection;
use serde_json::Value;

use crate::{
    error::{AppError, AppResult},
    models::book::{BookCreated, BookDeleted, BookPage, PageQuery, RatingUpdated},
    AppState,
};

/// Query string as ordered key/value pairs, so a repeated key is not a rejection
type QueryPairs = Vec<(String, String)>;

/// List one page of books, 8 per page in ascending id order
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    params(PageQuery),
    responses(
        (status = 200, description = "Page of books", body = BookPage),
        (status = 404, description = "Page is empty", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_books(
    State(state): State<AppState>,
    WithRejection(Query(query), _): WithRejection<Query<QueryPairs>, AppError>,
) -> AppResult<Json<BookPage>> {
    let page = PageQuery::from_pairs(query).page();
    let listing = state.services.catalog.list_books(page).await?;
    Ok(Json(listing))
}

/// Update the rating of a book
#[utoipa::path(
    patch,
    path = "/books/{id}",
    tag = "books",
    params(("id" = i32, Path, description = "Book ID")),
    request_body = crate::models::book::UpdateRating,
    responses(
        (status = 200, description = "Rating updated", body = RatingUpdated),
        (status = 400, description = "Rating is not an integer", body = crate::error::ErrorResponse),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_book(
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<i32>, AppError>,
    WithRejection(Json(body), _): WithRejection<Json<Value>, AppError>,
) -> AppResult<Json<RatingUpdated>> {
    let updated = state.services.catalog.update_rating(id, &body).await?;
    Ok(Json(updated))
}

/// Delete a book and return the requested page of the remaining catalog
#[utoipa::path(
    delete,
    path = "/books/{id}",
    tag = "books",
    params(
        ("id" = i32, Path, description = "Book ID"),
        PageQuery
    ),
    responses(
        (status = 200, description = "Book deleted", body = BookDeleted),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse),
        (status = 422, description = "Deletion failed", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_book(
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<i32>, AppError>,
    WithRejection(Query(query), _): WithRejection<Query<QueryPairs>, AppError>,
) -> AppResult<Json<BookDeleted>> {
    let page = PageQuery::from_pairs(query).page();
    let deleted = state.services.catalog.delete_book(id, page).await?;
    Ok(Json(deleted))
}

/// Create a book and return the requested page of the updated catalog
#[utoipa::path(
    post,
    path = "/books",
    tag = "books",
    params(PageQuery),
    request_body = crate::models::book::CreateBook,
    responses(
        (status = 200, description = "Book created", body = BookCreated),
        (status = 400, description = "Body is not a JSON object", body = crate::error::ErrorResponse),
        (status = 422, description = "Book could not be stored", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_book(
    State(state): State<AppState>,
    WithRejection(Query(query), _): WithRejection<Query<QueryPairs>, AppError>,
    WithRejection(Json(body), _): WithRejection<Json<Value>, AppError>,
) -> AppResult<Json<BookCreated>> {
    let page = PageQuery::from_pairs(query).page();
    let created = state.services.catalog.create_book(&body, page).await?;
    Ok(Json(created))
}
