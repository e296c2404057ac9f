// libs/scheduling-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDateTime;
use serde::Deserialize;
use serde_json::{json, Value};

use shared_models::error::AppError;

use crate::models::{
    Appointment, NewAppointment, ScheduleError, ShiftOffsets, TIME_FORMAT,
};
use crate::store::AppointmentStore;

// ==============================================================================
// QUERY PARAMETER STRUCTS
// ==============================================================================

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub category: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ShiftQuery {
    pub amount_start: Option<String>,
    pub amount_end: Option<String>,
}

// ==============================================================================
// REQUEST VALIDATION
// ==============================================================================

/// The exact key set a create/update body must carry, sorted.
const REQUIRED_FIELDS: [&str; 4] = ["category", "end", "start", "title"];

/// Validates the raw body against the appointment schema: exactly the four
/// required keys (extra keys are rejected too), a non-empty title, strictly
/// formatted timestamps, and a known category.
fn extract_appointment_fields(body: &Value) -> Result<NewAppointment, ScheduleError> {
    let object = body.as_object().ok_or_else(invalid_field_set)?;

    let mut keys: Vec<&str> = object.keys().map(String::as_str).collect();
    keys.sort_unstable();
    if keys != REQUIRED_FIELDS {
        return Err(invalid_field_set());
    }

    let title = object
        .get("title")
        .and_then(Value::as_str)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| {
            ScheduleError::InvalidInput("Title must be a non-empty string".to_string())
        })?;

    let start = parse_timestamp(object.get("start"))?;
    let end = parse_timestamp(object.get("end"))?;

    let category = object
        .get("category")
        .and_then(Value::as_str)
        .ok_or_else(invalid_field_set)?
        .parse()?;

    Ok(NewAppointment {
        title: title.to_string(),
        start,
        end,
        category,
    })
}

fn invalid_field_set() -> ScheduleError {
    ScheduleError::InvalidInput("Invalid appointment: wrong or missing fields".to_string())
}

fn parse_timestamp(value: Option<&Value>) -> Result<NaiveDateTime, ScheduleError> {
    let raw = value.and_then(Value::as_str).ok_or_else(invalid_field_set)?;
    NaiveDateTime::parse_from_str(raw, TIME_FORMAT).map_err(|_| {
        ScheduleError::InvalidInput(format!(
            "Invalid timestamp '{}'. Expected format YYYY-MM-DD HH:MM",
            raw
        ))
    })
}

/// Missing shift amounts default to zero; anything that does not parse to a
/// finite number is carried as `None` so the store can still report an
/// unknown id ahead of the bad offset.
fn parse_day_offset(raw: Option<&str>) -> Option<f64> {
    raw.unwrap_or("0")
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|days| days.is_finite())
}

// ==============================================================================
// APPOINTMENT HANDLERS
// ==============================================================================

#[axum::debug_handler]
pub async fn list_appointments(
    State(store): State<Arc<AppointmentStore>>,
    Query(params): Query<ListQuery>,
) -> Result<Json<Vec<Appointment>>, AppError> {
    // An empty filter value means no filter, same as an absent one.
    let filter = match params.category.as_deref() {
        Some(raw) if !raw.is_empty() => Some(raw.parse()?),
        _ => None,
    };

    let appointments = store.list(filter).await?;
    Ok(Json(appointments))
}

#[axum::debug_handler]
pub async fn create_appointment(
    State(store): State<Arc<AppointmentStore>>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<Appointment>), AppError> {
    let new = extract_appointment_fields(&body)?;
    let appointment = store.insert(new).await?;
    Ok((StatusCode::CREATED, Json(appointment)))
}

#[axum::debug_handler]
pub async fn update_appointment(
    State(store): State<Arc<AppointmentStore>>,
    Path(appointment_id): Path<i64>,
    Json(body): Json<Value>,
) -> Result<Json<Appointment>, AppError> {
    let new = extract_appointment_fields(&body)?;
    let appointment = store.update(appointment_id, new).await?;
    Ok(Json(appointment))
}

#[axum::debug_handler]
pub async fn delete_appointment(
    State(store): State<Arc<AppointmentStore>>,
    Path(appointment_id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    store.delete(appointment_id).await?;
    Ok(Json(json!({ "status": "deleted" })))
}

#[axum::debug_handler]
pub async fn shift_appointment(
    State(store): State<Arc<AppointmentStore>>,
    Path(appointment_id): Path<i64>,
    Query(params): Query<ShiftQuery>,
) -> Result<Json<Appointment>, AppError> {
    let offsets = ShiftOffsets {
        start_days: parse_day_offset(params.amount_start.as_deref()),
        end_days: parse_day_offset(params.amount_end.as_deref()),
    };

    let appointment = store.shift(appointment_id, offsets).await?;
    Ok(Json(appointment))
}
