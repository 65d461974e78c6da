use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};

use crate::{handlers::players::*, middleware::auth::require_admin, state::AppState};

pub fn player_routes(state: &AppState) -> Router<AppState> {
    let public = Router::new().route("/", get(list_players));

    let admin = Router::new()
        .route("/", post(create_player))
        .route("/:id", put(update_player).delete(delete_player))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin));

    public.merge(admin)
}
