use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};

use crate::{handlers::scores::*, middleware::auth::require_admin, state::AppState};

pub fn score_routes(state: &AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/:id", get(get_score))
        .route("/match/:id", get(get_scores_for_match))
        .route("/match/:id/all", get(get_all_scores_for_match));

    let admin = Router::new()
        .route("/", post(create_score))
        .route(
            "/:id",
            put(update_score).post(update_score).delete(delete_score),
        )
        .route("/:id/start", post(start_score))
        .route("/:id/complete", post(complete_score))
        .route("/match/:id/complete", post(complete_match_scores))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin));

    public.merge(admin)
}

// Box score views read the lines of a match from here; an empty list is fine.
pub fn event_routes() -> Router<AppState> {
    Router::new().route("/match/:id", get(get_all_scores_for_match))
}
