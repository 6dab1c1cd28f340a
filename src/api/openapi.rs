//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{books, health};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Bookshelf API",
        version = "0.1.0",
        description = "Paginated book catalog REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Books
        books::list_books,
        books::update_book,
        books::delete_book,
        books::create_book,
    ),
    components(
        schemas(
            crate::models::book::Book,
            crate::models::book::BookPage,
            crate::models::book::BookCreated,
            crate::models::book::BookDeleted,
            crate::models::book::RatingUpdated,
            crate::models::book::CreateBook,
            crate::models::book::UpdateRating,
            health::HealthResponse,
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "books", description = "Book catalog")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_book_routes() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/books"));
        assert!(doc.paths.paths.contains_key("/books/{id}"));
        assert!(doc.paths.paths.contains_key("/ready"));
    }
}
