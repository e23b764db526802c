//! REST handlers for groups and queue views.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/api/health` | Liveness probe |
//! | `GET` | `/api/groups` | List all groups in queue order |
//! | `POST` | `/api/groups` | Register a group |
//! | `GET` | `/api/groups/:id` | Single group |
//! | `PATCH` | `/api/groups/:id` | Partial update, stamps start/end times |
//! | `DELETE` | `/api/groups/:id` | Remove a group |
//! | `GET` | `/api/queue/stats` | Aggregate counts |
//! | `GET` | `/api/queue/estimate` | Wait estimate (`?groupId=N` or next registrant) |
//! | `GET` | `/api/queue/overdue` | Running groups past their activity time |

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Deserializer};
use validator::{Validate, ValidationError};
use walkin_core::{GroupPatch, NewGroup, estimator, turns};
use walkin_types::{GroupId, GroupStatus, WaitEstimate};

use crate::error::ApiError;
use crate::state::AppState;

/// Longest accepted per-group activity duration, in minutes.
const MAX_ACTIVITY_MINUTES: u32 = 480;

// ---------------------------------------------------------------------------
// Request / query types
// ---------------------------------------------------------------------------

/// Request body for `POST /api/groups`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateGroupRequest {
    /// Member names; at least one, none blank.
    #[validate(
        length(min = 1, message = "at least one member is required"),
        custom(function = "validate_member_names")
    )]
    pub members: Vec<String>,
    /// Initial status (default `waiting`).
    pub status: Option<GroupStatus>,
    /// Assigned staff label.
    pub assigned_staff: Option<String>,
    /// Staff notes.
    pub notes: Option<String>,
    /// Checked in at the venue (default `false`).
    pub present: Option<bool>,
    /// Explicit start time.
    pub start_time: Option<DateTime<Utc>>,
    /// Explicit end time.
    pub end_time: Option<DateTime<Utc>>,
    /// Per-group duration in minutes.
    #[validate(range(min = 1, max = 480, message = "must be between 1 and 480 minutes"))]
    pub activity_duration: Option<u32>,
}

impl CreateGroupRequest {
    fn into_new_group(self) -> NewGroup {
        NewGroup {
            members: trim_names(self.members),
            status: self.status.unwrap_or_default(),
            assigned_staff: self.assigned_staff.and_then(non_blank),
            notes: self.notes,
            present: self.present.unwrap_or(false),
            start_time: self.start_time,
            end_time: self.end_time,
            activity_duration: self.activity_duration,
        }
    }
}

/// Request body for `PATCH /api/groups/:id`.
///
/// Absent fields are left alone; `null` clears a nullable field. Fields the
/// store assigns (`id`, `size`, `queuePosition`, `registrationTime`) are
/// ignored if sent.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_update"))]
pub struct UpdateGroupRequest {
    /// Replacement member list.
    #[validate(
        length(min = 1, message = "at least one member is required"),
        custom(function = "validate_member_names")
    )]
    pub members: Option<Vec<String>>,
    /// New status; must not move backwards.
    pub status: Option<GroupStatus>,
    /// New staff label.
    #[serde(default, deserialize_with = "nullable")]
    pub assigned_staff: Option<Option<String>>,
    /// New notes.
    #[serde(default, deserialize_with = "nullable")]
    pub notes: Option<Option<String>>,
    /// New check-in flag.
    pub present: Option<bool>,
    /// New start time.
    #[serde(default, deserialize_with = "nullable")]
    pub start_time: Option<Option<DateTime<Utc>>>,
    /// New end time.
    #[serde(default, deserialize_with = "nullable")]
    pub end_time: Option<Option<DateTime<Utc>>>,
    /// New per-group duration.
    #[serde(default, deserialize_with = "nullable")]
    pub activity_duration: Option<Option<u32>>,
}

impl UpdateGroupRequest {
    /// Build the store patch, stamping `now` on a move into `in-progress`
    /// or `completed` when the caller sent no time of their own.
    fn into_patch(self, current: GroupStatus, now: DateTime<Utc>) -> GroupPatch {
        let entering = |target: GroupStatus| self.status == Some(target) && current != target;

        let start_time = match self.start_time {
            Some(Some(t)) => Some(Some(t)),
            _ if entering(GroupStatus::InProgress) => Some(Some(now)),
            supplied => supplied,
        };
        let end_time = match self.end_time {
            Some(Some(t)) => Some(Some(t)),
            _ if entering(GroupStatus::Completed) => Some(Some(now)),
            supplied => supplied,
        };

        GroupPatch {
            members: self.members.map(trim_names),
            status: self.status,
            assigned_staff: self.assigned_staff.map(|s| s.and_then(non_blank)),
            notes: self.notes,
            present: self.present,
            start_time,
            end_time,
            activity_duration: self.activity_duration,
        }
    }
}

/// Query parameters for `GET /api/queue/estimate`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimateQuery {
    /// Estimate for this waiting group; omit for the next registrant.
    pub group_id: Option<u64>,
}

/// Response body for `GET /api/queue/estimate`.
#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct EstimateResponse {
    #[serde(flatten)]
    estimate: WaitEstimate,
    group_id: Option<GroupId>,
    on_break: bool,
}

// ---------------------------------------------------------------------------
// GET /api/health
// ---------------------------------------------------------------------------

/// Liveness probe.
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

// ---------------------------------------------------------------------------
// Groups
// ---------------------------------------------------------------------------

/// List all groups ordered by queue position.
pub async fn list_groups(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let groups = state.store.read().await.groups();
    Json(groups)
}

/// Return a single group.
pub async fn get_group(
    State(state): State<Arc<AppState>>,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id::<GroupId>(&id_str)?;
    let store = state.store.read().await;
    let group = store
        .group(id)
        .cloned()
        .ok_or_else(|| ApiError::NotFound(format!("group {id}")))?;
    Ok(Json(group))
}

/// Register a new group at the back of the queue.
pub async fn create_group(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreateGroupRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(body) = payload?;
    body.validate()?;

    let group = state
        .store
        .write()
        .await
        .create_group(body.into_new_group(), Utc::now());

    tracing::info!(
        group_id = %group.id,
        size = group.size,
        queue_position = group.queue_position,
        "group registered"
    );
    Ok((StatusCode::CREATED, Json(group)))
}

/// Apply a partial update to a group.
pub async fn update_group(
    State(state): State<Arc<AppState>>,
    Path(id_str): Path<String>,
    payload: Result<Json<UpdateGroupRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id::<GroupId>(&id_str)?;
    let Json(body) = payload?;
    body.validate()?;

    let mut store = state.store.write().await;
    let current = store
        .group(id)
        .map(|g| g.status)
        .ok_or_else(|| ApiError::NotFound(format!("group {id}")))?;

    if let Some(next) = body.status
        && !current.can_transition_to(next)
    {
        return Err(ApiError::Conflict(format!(
            "group {id} cannot move from {current} back to {next}"
        )));
    }

    let patch = body.into_patch(current, Utc::now());
    let group = store
        .update_group(id, patch)
        .ok_or_else(|| ApiError::NotFound(format!("group {id}")))?;

    if group.status != current {
        tracing::info!(group_id = %id, from = %current, to = %group.status, "group status changed");
    }
    Ok(Json(group))
}

/// Remove a group.
pub async fn delete_group(
    State(state): State<Arc<AppState>>,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id::<GroupId>(&id_str)?;
    if state.store.write().await.delete_group(id) {
        tracing::info!(group_id = %id, "group deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound(format!("group {id}")))
    }
}

// ---------------------------------------------------------------------------
// Queue views
// ---------------------------------------------------------------------------

/// Aggregate counts over every group.
pub async fn queue_stats(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.store.read().await.stats())
}

/// Wait estimate for a waiting group, or for the next registrant.
pub async fn queue_estimate(
    State(state): State<Arc<AppState>>,
    query: Result<Query<EstimateQuery>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Query(params) = query?;
    let target = params.group_id.map(GroupId::from);

    let store = state.store.read().await;
    let settings = store.queue_settings(&state.defaults);
    let groups = store.groups();
    drop(store);

    let now = Local::now();
    let estimate = estimator::estimate(&groups, &settings, target, &now);

    Ok(Json(EstimateResponse {
        estimate,
        group_id: target,
        on_break: settings.on_break_at(now.time()),
    }))
}

/// Running groups whose activity time is up.
pub async fn queue_overdue(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let store = state.store.read().await;
    let settings = store.queue_settings(&state.defaults);
    let overdue = turns::overdue_turns(&store.groups(), &settings, Utc::now());
    Json(overdue)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Parse a numeric id from a path segment.
pub(crate) fn parse_id<T>(s: &str) -> Result<T, ApiError>
where
    T: core::str::FromStr<Err = core::num::ParseIntError>,
{
    s.parse::<T>()
        .map_err(|e| ApiError::InvalidId(format!("{s}: {e}")))
}

/// Distinguish an absent field (`None`) from an explicit `null`
/// (`Some(None)`).
fn nullable<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

pub(crate) fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank").with_message("must not be blank".into()));
    }
    Ok(())
}

fn validate_member_names(members: &[String]) -> Result<(), ValidationError> {
    if members.iter().any(|m| m.trim().is_empty()) {
        return Err(ValidationError::new("blank_member")
            .with_message("member names must not be blank".into()));
    }
    Ok(())
}

fn validate_update(req: &UpdateGroupRequest) -> Result<(), ValidationError> {
    match req.activity_duration {
        Some(Some(minutes)) if minutes == 0 || minutes > MAX_ACTIVITY_MINUTES => {
            Err(ValidationError::new("activity_duration")
                .with_message("activityDuration must be between 1 and 480 minutes".into()))
        }
        _ => Ok(()),
    }
}

fn trim_names(names: Vec<String>) -> Vec<String> {
    names.into_iter().map(|n| n.trim().to_owned()).collect()
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn at(h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, h, 0, 0).unwrap()
    }

    #[test]
    fn absent_and_null_fields_differ() {
        let absent: UpdateGroupRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(absent.assigned_staff, None);

        let null: UpdateGroupRequest =
            serde_json::from_str(r#"{"assignedStaff": null}"#).unwrap();
        assert_eq!(null.assigned_staff, Some(None));

        let set: UpdateGroupRequest =
            serde_json::from_str(r#"{"assignedStaff": "Mike Wilson"}"#).unwrap();
        assert_eq!(set.assigned_staff, Some(Some("Mike Wilson".to_owned())));
    }

    #[test]
    fn entering_in_progress_stamps_start() {
        let req = UpdateGroupRequest {
            status: Some(GroupStatus::InProgress),
            ..UpdateGroupRequest::default()
        };
        let patch = req.into_patch(GroupStatus::Waiting, at(10));
        assert_eq!(patch.start_time, Some(Some(at(10))));
        assert_eq!(patch.end_time, None);
    }

    #[test]
    fn supplied_start_time_wins() {
        let req = UpdateGroupRequest {
            status: Some(GroupStatus::InProgress),
            start_time: Some(Some(at(9))),
            ..UpdateGroupRequest::default()
        };
        let patch = req.into_patch(GroupStatus::Waiting, at(10));
        assert_eq!(patch.start_time, Some(Some(at(9))));
    }

    #[test]
    fn repeating_the_current_status_does_not_restamp() {
        let req = UpdateGroupRequest {
            status: Some(GroupStatus::InProgress),
            ..UpdateGroupRequest::default()
        };
        let patch = req.into_patch(GroupStatus::InProgress, at(10));
        assert_eq!(patch.start_time, None);
    }

    #[test]
    fn completing_stamps_end() {
        let req = UpdateGroupRequest {
            status: Some(GroupStatus::Completed),
            ..UpdateGroupRequest::default()
        };
        let patch = req.into_patch(GroupStatus::InProgress, at(11));
        assert_eq!(patch.end_time, Some(Some(at(11))));
        assert_eq!(patch.start_time, None);
    }

    #[test]
    fn create_request_validation() {
        let empty: CreateGroupRequest = serde_json::from_str(r#"{"members": []}"#).unwrap();
        assert!(empty.validate().is_err());

        let blank: CreateGroupRequest =
            serde_json::from_str(r#"{"members": ["Ana", "  "]}"#).unwrap();
        assert!(blank.validate().is_err());

        let zero_minutes: CreateGroupRequest =
            serde_json::from_str(r#"{"members": ["Ana"], "activityDuration": 0}"#).unwrap();
        assert!(zero_minutes.validate().is_err());

        let ok: CreateGroupRequest =
            serde_json::from_str(r#"{"members": [" Ana ", "Ben"], "assignedStaff": " "}"#)
                .unwrap();
        assert!(ok.validate().is_ok());
        let new = ok.into_new_group();
        assert_eq!(new.members, vec!["Ana", "Ben"]);
        assert_eq!(new.assigned_staff, None);
        assert_eq!(new.status, GroupStatus::Waiting);
    }

    #[test]
    fn update_duration_bounds() {
        let zero: UpdateGroupRequest =
            serde_json::from_str(r#"{"activityDuration": 0}"#).unwrap();
        assert!(zero.validate().is_err());
        let cleared: UpdateGroupRequest =
            serde_json::from_str(r#"{"activityDuration": null}"#).unwrap();
        assert!(cleared.validate().is_ok());
    }

    #[test]
    fn ids_parse_or_reject() {
        assert_eq!(parse_id::<GroupId>("4").unwrap(), GroupId(4));
        assert!(matches!(
            parse_id::<GroupId>("four"),
            Err(ApiError::InvalidId(_))
        ));
    }
}
