use axum::routing::get;
use axum::Router;

use crate::handlers::customer;
use crate::state::AppState;

/// Customer routes mounted at `/customers`.
///
/// ```text
/// GET    /          -> list
/// POST   /          -> create (multipart)
/// GET    /{id}      -> get_by_id
/// PUT    /{id}      -> update (multipart)
/// DELETE /{id}      -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(customer::list).post(customer::create))
        .route(
            "/{id}",
            get(customer::get_by_id)
                .put(customer::update)
                .delete(customer::delete),
        )
}
