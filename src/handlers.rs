use axum::{
    Json,
    extract::State,
    http::{Method, StatusCode, Uri},
};

use crate::{
    error::{AppError, AppResult},
    extract::{AppJson, AppPath},
    models::{self, ApiMessage, ApiResponse, NewState, StateDto},
    state::AppState,
};

pub async fn healthcheck() -> Json<ApiResponse<ApiMessage>> {
    Json(ApiResponse {
        data: ApiMessage {
            message: "ok".to_string(),
        },
    })
}

/// A `null` body reaches the service as an absent state.
pub async fn create_state(
    State(app): State<AppState>,
    AppJson(payload): AppJson<Option<NewState>>,
) -> AppResult<(StatusCode, Json<ApiResponse<models::State>>)> {
    let state = app.states.create(payload.map(NewState::into_state)).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse { data: state })))
}

pub async fn list_states(
    State(app): State<AppState>,
) -> AppResult<Json<ApiResponse<Vec<models::State>>>> {
    let states = app.states.get_all().await?;
    Ok(Json(ApiResponse { data: states }))
}

pub async fn list_state_names(
    State(app): State<AppState>,
) -> AppResult<Json<ApiResponse<Vec<StateDto>>>> {
    let names = app.states.find_all().await?;
    Ok(Json(ApiResponse { data: names }))
}

pub async fn get_state(
    State(app): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> AppResult<Json<ApiResponse<models::State>>> {
    let state = app.states.read_by_id(id).await?;
    Ok(Json(ApiResponse { data: state }))
}

pub async fn get_state_by_name(
    State(app): State<AppState>,
    AppPath(name): AppPath<String>,
) -> AppResult<Json<ApiResponse<models::State>>> {
    let state = app.states.get_by_name(&name).await?;
    Ok(Json(ApiResponse { data: state }))
}

/// The path id wins over anything the client might think the id is.
pub async fn update_state(
    State(app): State<AppState>,
    AppPath(id): AppPath<i64>,
    AppJson(payload): AppJson<Option<NewState>>,
) -> AppResult<Json<ApiResponse<models::State>>> {
    let state = app
        .states
        .update(payload.map(|payload| payload.into_state_with_id(id)))
        .await?;
    Ok(Json(ApiResponse { data: state }))
}

pub async fn delete_state(
    State(app): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> AppResult<StatusCode> {
    app.states.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn no_route(method: Method, uri: Uri) -> AppError {
    AppError::Unroutable(format!("No handler for {method} {}", uri.path()))
}

pub async fn method_not_allowed(method: Method, uri: Uri) -> AppError {
    AppError::Unroutable(format!(
        "Request method '{method}' is not supported for {}",
        uri.path()
    ))
}
