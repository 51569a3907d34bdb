use actix_web::{HttpResponse, Responder, web};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::MySqlPool;
use tracing::error;
use utoipa::{IntoParams, ToSchema};

use crate::model::work_record::Annotation;
use crate::service::clock::LocalClock;

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct SummaryQuery {
    #[schema(example = "alice01")]
    pub username: String,

    #[schema(example = 2026)]
    pub year: i32,

    #[schema(example = 3)]
    pub month: u32,
}

/// One timesheet row joined with the employee's payroll fields.
#[derive(Serialize, sqlx::FromRow, ToSchema)]
pub struct SummaryRow {
    pub username: String,

    #[schema(value_type = String, format = "date-time")]
    pub clock_in: DateTime<Utc>,

    #[schema(value_type = String, format = "date-time", nullable = true)]
    pub clock_out: Option<DateTime<Utc>>,

    pub total_hours: f64,
    pub annotation: Option<String>,
    pub note: Option<String>,
    pub name: String,
    pub location: Option<String>,
    pub wage: Option<f64>,

    #[schema(value_type = String, format = "time", nullable = true)]
    pub work_start: Option<NaiveTime>,

    #[schema(value_type = String, format = "time", nullable = true)]
    pub work_end: Option<NaiveTime>,
}

#[derive(Deserialize, ToSchema)]
pub struct UpdateRecord {
    #[schema(example = "2026-03-02T00:00:00Z", value_type = String, format = "date-time")]
    pub clock_in: DateTime<Utc>,

    #[schema(example = "2026-03-02T08:00:00Z", value_type = String, format = "date-time", nullable = true)]
    pub clock_out: Option<DateTime<Utc>>,

    #[schema(example = 8.0)]
    pub total_hours: f64,

    pub annotation: Option<Annotation>,
    pub note: Option<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct InsertRecord {
    #[schema(example = "alice01")]
    pub username: String,

    #[schema(example = "2026-03-02T00:00:00Z", value_type = String, format = "date-time")]
    pub clock_in: DateTime<Utc>,

    #[schema(example = "2026-03-02T08:00:00Z", value_type = String, format = "date-time", nullable = true)]
    pub clock_out: Option<DateTime<Utc>>,

    #[schema(example = 8.0, nullable = true)]
    pub total_hours: Option<f64>,

    pub annotation: Option<Annotation>,
    pub note: Option<String>,
}

/// Monthly timesheet for one employee
#[utoipa::path(
    get,
    path = "/api/admin/work-summary",
    params(SummaryQuery),
    responses(
        (status = 200, description = "Timesheet rows for the local month", body = [SummaryRow]),
        (status = 400, description = "Invalid year/month"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Admin"
)]
pub async fn work_summary(
    pool: web::Data<MySqlPool>,
    clock: web::Data<LocalClock>,
    query: web::Query<SummaryQuery>,
) -> impl Responder {
    // Month boundaries are local calendar days converted to UTC once.
    let Some(month_start) = NaiveDate::from_ymd_opt(query.year, query.month, 1) else {
        return HttpResponse::BadRequest().json(json!({
            "message": "Invalid year/month"
        }));
    };
    let next_month = if query.month == 12 {
        NaiveDate::from_ymd_opt(query.year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(query.year, query.month + 1, 1)
    };
    let Some(month_end) = next_month else {
        return HttpResponse::BadRequest().json(json!({
            "message": "Invalid year/month"
        }));
    };

    let from = clock.instant_at(month_start, NaiveTime::MIN);
    let to = clock.instant_at(month_end, NaiveTime::MIN);

    let result = sqlx::query_as::<_, SummaryRow>(
        "SELECT wr.username, wr.clock_in, wr.clock_out, wr.total_hours, wr.annotation, wr.note, \
                u.name, u.location, u.wage, u.work_start, u.work_end \
         FROM work_records wr \
         JOIN users u ON wr.username = u.username \
         WHERE wr.username = ? AND wr.clock_in >= ? AND wr.clock_in < ? \
         ORDER BY wr.clock_in ASC",
    )
    .bind(&query.username)
    .bind(from)
    .bind(to)
    .fetch_all(pool.get_ref())
    .await;

    match result {
        Ok(rows) => HttpResponse::Ok().json(rows),
        Err(e) => {
            error!(error = %e, username = %query.username, "Failed to fetch work summary");
            HttpResponse::InternalServerError().json(json!({
                "message": "Internal Server Error"
            }))
        }
    }
}

/// Administrative edit of an attendance record
#[utoipa::path(
    put,
    path = "/api/admin/records/{id}",
    request_body = UpdateRecord,
    params(("id", description = "Record ID")),
    responses(
        (status = 200, description = "Record updated"),
        (status = 404, description = "Record not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Admin"
)]
pub async fn update_record(
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    payload: web::Json<UpdateRecord>,
) -> impl Responder {
    let id = path.into_inner();

    let result = sqlx::query(
        "UPDATE work_records \
         SET clock_in = ?, clock_out = ?, total_hours = ?, annotation = ?, note = ? \
         WHERE id = ?",
    )
    .bind(payload.clock_in)
    .bind(payload.clock_out)
    .bind(payload.total_hours)
    .bind(payload.annotation.map(|a| a.to_string()))
    .bind(&payload.note)
    .bind(id)
    .execute(pool.get_ref())
    .await;

    match result {
        Ok(r) if r.rows_affected() == 0 => HttpResponse::NotFound().json(json!({
            "message": "Record not found"
        })),
        Ok(_) => HttpResponse::Ok().json(json!({
            "message": "Record updated successfully"
        })),
        Err(e) => {
            error!(error = %e, id, "Failed to update record");
            HttpResponse::InternalServerError().json(json!({
                "message": "Internal Server Error"
            }))
        }
    }
}

/// Manual insert of an attendance record
#[utoipa::path(
    post,
    path = "/api/admin/records",
    request_body = InsertRecord,
    responses(
        (status = 201, description = "Record created"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Admin"
)]
pub async fn insert_record(
    pool: web::Data<MySqlPool>,
    payload: web::Json<InsertRecord>,
) -> impl Responder {
    let result = sqlx::query(
        "INSERT INTO work_records (username, clock_in, clock_out, total_hours, annotation, note) \
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(&payload.username)
    .bind(payload.clock_in)
    .bind(payload.clock_out)
    .bind(payload.total_hours.unwrap_or(0.0))
    .bind(payload.annotation.map(|a| a.to_string()))
    .bind(&payload.note)
    .execute(pool.get_ref())
    .await;

    match result {
        Ok(_) => HttpResponse::Created().json(json!({
            "message": "Record created"
        })),
        Err(e) => {
            error!(error = %e, username = %payload.username, "Failed to insert record");
            HttpResponse::InternalServerError().json(json!({
                "message": "Internal Server Error"
            }))
        }
    }
}

/// Delete an attendance record
#[utoipa::path(
    delete,
    path = "/api/admin/records/{id}",
    params(("id", description = "Record ID")),
    responses(
        (status = 200, description = "Record deleted"),
        (status = 404, description = "Record not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Admin"
)]
pub async fn delete_record(pool: web::Data<MySqlPool>, path: web::Path<u64>) -> impl Responder {
    let id = path.into_inner();

    let result = sqlx::query("DELETE FROM work_records WHERE id = ?")
        .bind(id)
        .execute(pool.get_ref())
        .await;

    match result {
        Ok(r) if r.rows_affected() == 0 => HttpResponse::NotFound().json(json!({
            "message": "Record not found"
        })),
        Ok(_) => HttpResponse::Ok().json(json!({
            "message": "Record deleted"
        })),
        Err(e) => {
            error!(error = %e, id, "Failed to delete record");
            HttpResponse::InternalServerError().json(json!({
                "message": "Internal Server Error"
            }))
        }
    }
}
