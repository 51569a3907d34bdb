use actix_web::{HttpResponse, Responder, web};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use serde_json::json;
use utoipa::ToSchema;

use crate::api::lifecycle_error_response;
use crate::service::lifecycle::{AttendanceLifecycle, ClockInOutcome, ClockOutOutcome};
use crate::store::mysql::MySqlStore;

type Lifecycle = AttendanceLifecycle<MySqlStore>;

#[derive(Deserialize, ToSchema)]
pub struct ClockRequest {
    #[schema(example = "alice01")]
    pub username: String,
}

#[derive(Deserialize, ToSchema)]
pub struct StatusRequest {
    #[schema(example = "alice01")]
    pub username: String,

    /// Local calendar date to check; defaults to today.
    #[schema(example = "2026-03-02", value_type = String, format = "date", nullable = true)]
    pub date: Option<NaiveDate>,
}

/// Clock-in endpoint
#[utoipa::path(
    post,
    path = "/api/work/clock-in",
    request_body = ClockRequest,
    responses(
        (status = 201, description = "Clock-in recorded", body = Object, example = json!({
            "message": "Clock-in recorded"
        })),
        (status = 200, description = "Not a scheduled work day", body = Object, example = json!({
            "message": "Not a scheduled work day"
        })),
        (status = 400, description = "Already clocked in", body = Object, example = json!({
            "message": "Already clocked in"
        })),
        (status = 404, description = "Employee not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Work"
)]
pub async fn clock_in(
    lifecycle: web::Data<Lifecycle>,
    payload: web::Json<ClockRequest>,
) -> impl Responder {
    match lifecycle.clock_in(&payload.username, Utc::now()).await {
        Ok(ClockInOutcome::Recorded(record)) => HttpResponse::Created().json(json!({
            "message": "Clock-in recorded",
            "record": record
        })),
        Ok(ClockInOutcome::NotContractDay) => HttpResponse::Ok().json(json!({
            "message": "Not a scheduled work day"
        })),
        Ok(ClockInOutcome::AlreadyClockedIn) => HttpResponse::BadRequest().json(json!({
            "message": "Already clocked in"
        })),
        Err(e) => lifecycle_error_response(&e, &payload.username, "clock-in"),
    }
}

/// Clock-out endpoint
#[utoipa::path(
    post,
    path = "/api/work/clock-out",
    request_body = ClockRequest,
    responses(
        (status = 200, description = "Shift closed and reconciled", body = Object, example = json!({
            "message": "Clock-out recorded"
        })),
        (status = 404, description = "No active clock-in found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Work"
)]
pub async fn clock_out(
    lifecycle: web::Data<Lifecycle>,
    payload: web::Json<ClockRequest>,
) -> impl Responder {
    match lifecycle.clock_out(&payload.username, Utc::now()).await {
        Ok(ClockOutOutcome::Closed(record)) => HttpResponse::Ok().json(json!({
            "message": "Clock-out recorded",
            "record": record
        })),
        Ok(ClockOutOutcome::TooEarly) => HttpResponse::Ok().json(json!({
            "message": "Too early to clock out"
        })),
        Err(e) => lifecycle_error_response(&e, &payload.username, "clock-out"),
    }
}

/// Clock-in status for one employee and local day
#[utoipa::path(
    post,
    path = "/api/work/status",
    request_body = StatusRequest,
    responses(
        (status = 200, description = "Current status", body = Object, example = json!({
            "isClockedIn": true
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Work"
)]
pub async fn status(
    lifecycle: web::Data<Lifecycle>,
    payload: web::Json<StatusRequest>,
) -> impl Responder {
    let date = payload
        .date
        .unwrap_or_else(|| lifecycle.clock().local_date(Utc::now()));

    match lifecycle.is_clocked_in(&payload.username, date).await {
        Ok(is_clocked_in) => HttpResponse::Ok().json(json!({
            "isClockedIn": is_clocked_in
        })),
        Err(e) => lifecycle_error_response(&e, &payload.username, "status"),
    }
}
