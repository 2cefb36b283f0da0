//! User record handlers.
use crate::api::error::{ApiError, api_internal, api_not_found};
use crate::api::types::ActorView;
use crate::app::AppState;
use crate::store::StoreError;
use axum::Json;
use axum::extract::{Path, State};
use mesh_authz::ActorId;

#[utoipa::path(
    get,
    path = "/api/v1/users/{username}",
    tag = "users",
    params(("username" = String, Path, description = "Actor id")),
    responses(
        (status = 200, description = "Actor record", body = ActorView),
        (status = 403, description = "Not the caller's own record", body = ErrorResponse),
        (status = 404, description = "Actor not found", body = ErrorResponse)
    ),
    security(("bearer" = []))
)]
/// Return the caller's own actor record.
///
/// # Errors
/// - 404 when the actor no longer exists.
/// - 500 when the store is unavailable.
pub(crate) async fn get_user(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<ActorView>, ApiError> {
    let actor = state
        .store
        .fetch_actor(&ActorId::new(username))
        .await
        .map_err(StoreError::from)
        .map_err(|err| match err {
            StoreError::NotFound(message) => api_not_found(&message),
            other => api_internal("failed to load user", &other),
        })?;
    Ok(Json(ActorView::from(actor)))
}
