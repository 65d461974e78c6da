use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};

use crate::{handlers::schedule::*, middleware::auth::require_admin, state::AppState};

pub fn schedule_routes(state: &AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/", get(list_matches))
        .route("/upcoming", get(get_upcoming))
        .route("/:id", get(get_match));

    let admin = Router::new()
        .route("/", post(create_match))
        .route("/:id", delete(delete_match))
        .route("/:id/start", post(start_match))
        .route("/:id/complete", post(complete_match))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin));

    public.merge(admin)
}

pub fn match_routes() -> Router<AppState> {
    Router::new()
        .route("/:id", get(get_match_with_scores))
        .route("/:id/scores", get(get_match_scores))
}
