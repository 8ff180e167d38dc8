use axum::{
    Router,
    http::Method,
    middleware,
    routing::get,
};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    handlers::{
        create_state, delete_state, get_state, get_state_by_name, healthcheck, list_state_names,
        list_states, method_not_allowed, no_route, update_state,
    },
    responder::{panic_response, respond_to_errors},
    state::AppState,
};

pub fn build_router(state: AppState) -> Router {
    api_routes()
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(middleware::from_fn_with_state(
            state.responder.clone(),
            respond_to_errors,
        ))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_headers(Any)
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PUT,
                    Method::DELETE,
                    Method::OPTIONS,
                ]),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(healthcheck))
        .route("/api/v1/states", get(list_states).post(create_state))
        .route("/api/v1/states/names", get(list_state_names))
        .route("/api/v1/states/by-name/{name}", get(get_state_by_name))
        .route(
            "/api/v1/states/{id}",
            get(get_state).put(update_state).delete(delete_state),
        )
        .fallback(no_route)
        .method_not_allowed_fallback(method_not_allowed)
}
