//! Admin REST handlers for settings and the staff roster.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/api/settings` | All setting rows |
//! | `PUT` | `/api/settings/:key` | Upsert a setting |
//! | `GET` | `/api/staff` | Staff roster |
//! | `POST` | `/api/staff` | Add a staff member |
//! | `DELETE` | `/api/staff/:id` | Remove a staff member |

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use validator::Validate;
use walkin_core::settings::validate_setting;
use walkin_types::StaffId;

use crate::error::ApiError;
use crate::handlers::{parse_id, validate_not_blank};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `PUT /api/settings/:key`.
#[derive(Debug, serde::Deserialize)]
pub struct SetSettingRequest {
    /// New raw value.
    pub value: String,
}

/// Request body for `POST /api/staff`.
#[derive(Debug, serde::Deserialize, Validate)]
pub struct CreateStaffRequest {
    /// Display name, unique across the roster.
    #[validate(
        length(min = 1, max = 100, message = "name must be 1 to 100 characters"),
        custom(function = "validate_not_blank")
    )]
    pub name: String,
}

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

/// List every setting row.
pub async fn list_settings(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.store.read().await.settings())
}

/// Insert or replace a setting.
///
/// Well-known keys are format-checked; anything else is stored verbatim.
pub async fn put_setting(
    State(state): State<Arc<AppState>>,
    Path(key): Path<String>,
    payload: Result<Json<SetSettingRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(body) = payload?;
    let value = body.value.trim();
    validate_setting(&key, value)?;

    let setting = state.store.write().await.set_setting(&key, value);
    tracing::info!(key = %setting.key, value = %setting.value, "setting updated");
    Ok(Json(setting))
}

// ---------------------------------------------------------------------------
// Staff
// ---------------------------------------------------------------------------

/// List the staff roster.
pub async fn list_staff(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.store.read().await.staff())
}

/// Add a staff member.
pub async fn create_staff(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreateStaffRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(body) = payload?;
    body.validate()?;

    let staff = state.store.write().await.create_staff(body.name.trim())?;
    tracing::info!(staff_id = %staff.id, name = %staff.name, "staff member added");
    Ok((StatusCode::CREATED, Json(staff)))
}

/// Remove a staff member. Groups keep their assigned-staff label.
pub async fn delete_staff(
    State(state): State<Arc<AppState>>,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id::<StaffId>(&id_str)?;
    if state.store.write().await.delete_staff(id) {
        tracing::info!(staff_id = %id, "staff member removed");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound(format!("staff {id}")))
    }
}
