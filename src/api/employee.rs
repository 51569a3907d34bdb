use actix_web::{HttpResponse, Responder, web};
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::MySqlPool;
use tracing::error;
use utoipa::ToSchema;

use crate::model::employee::Employee;

#[derive(Serialize, ToSchema)]
pub struct UserResponse {
    pub id: u64,
    pub name: String,
    pub username: String,
    pub wage: Option<f64>,
    pub location: Option<String>,

    #[schema(example = json!(["Mon", "Tue", "Wed"]))]
    pub work_days: Vec<String>,

    #[schema(example = "09:00:00", value_type = String, format = "time", nullable = true)]
    pub work_start: Option<NaiveTime>,

    #[schema(example = "17:00:00", value_type = String, format = "time", nullable = true)]
    pub work_end: Option<NaiveTime>,
}

impl From<Employee> for UserResponse {
    fn from(user: Employee) -> Self {
        let work_days = user
            .work_days
            .as_deref()
            .map(|days| days.split(',').map(str::to_owned).collect())
            .unwrap_or_default();
        Self {
            id: user.id,
            name: user.name,
            username: user.username,
            wage: user.wage,
            location: user.location,
            work_days,
            work_start: user.work_start,
            work_end: user.work_end,
        }
    }
}

#[derive(Deserialize, ToSchema)]
pub struct UpdateUser {
    #[schema(example = "Alice Kim")]
    pub name: String,

    #[schema(example = "alice01")]
    pub username: String,

    #[schema(example = 11000.0, nullable = true)]
    pub wage: Option<f64>,

    #[schema(example = "Gangnam", nullable = true)]
    pub location: Option<String>,

    #[schema(example = json!(["Mon", "Tue", "Wed"]), nullable = true)]
    pub work_days: Option<Vec<String>>,

    #[schema(example = "09:00:00", value_type = String, format = "time", nullable = true)]
    pub work_start: Option<NaiveTime>,

    #[schema(example = "17:00:00", value_type = String, format = "time", nullable = true)]
    pub work_end: Option<NaiveTime>,
}

#[derive(Deserialize, ToSchema)]
pub struct ChangeWage {
    #[schema(example = 12000.0)]
    pub new_wage: f64,
}

/// List all employees
#[utoipa::path(
    get,
    path = "/api/admin/users",
    responses(
        (status = 200, description = "Employee list", body = [UserResponse]),
        (status = 500, description = "Internal server error")
    ),
    tag = "Admin"
)]
pub async fn list_users(pool: web::Data<MySqlPool>) -> impl Responder {
    let result = sqlx::query_as::<_, Employee>(
        "SELECT id, name, username, wage, location, work_days, work_start, work_end FROM users",
    )
    .fetch_all(pool.get_ref())
    .await;

    match result {
        Ok(users) => {
            let users: Vec<UserResponse> = users.into_iter().map(Into::into).collect();
            HttpResponse::Ok().json(users)
        }
        Err(e) => {
            error!(error = %e, "Failed to list users");
            HttpResponse::InternalServerError().json(json!({
                "message": "Internal Server Error"
            }))
        }
    }
}

/// Update an employee's profile and contract
#[utoipa::path(
    put,
    path = "/api/admin/users/{id}",
    request_body = UpdateUser,
    params(("id", description = "User ID")),
    responses(
        (status = 200, description = "User updated"),
        (status = 404, description = "User not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Admin"
)]
pub async fn update_user(
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    payload: web::Json<UpdateUser>,
) -> impl Responder {
    let id = path.into_inner();
    let work_days = payload.work_days.as_ref().map(|days| days.join(","));

    let result = sqlx::query(
        "UPDATE users \
         SET name = ?, username = ?, wage = ?, location = ?, work_days = ?, work_start = ?, work_end = ? \
         WHERE id = ?",
    )
    .bind(&payload.name)
    .bind(&payload.username)
    .bind(payload.wage)
    .bind(&payload.location)
    .bind(work_days)
    .bind(payload.work_start)
    .bind(payload.work_end)
    .bind(id)
    .execute(pool.get_ref())
    .await;

    match result {
        Ok(r) if r.rows_affected() == 0 => HttpResponse::NotFound().json(json!({
            "message": "User not found"
        })),
        Ok(_) => HttpResponse::Ok().json(json!({
            "message": "User updated successfully"
        })),
        Err(e) => {
            error!(error = %e, id, "Failed to update user");
            HttpResponse::InternalServerError().json(json!({
                "message": "Internal Server Error"
            }))
        }
    }
}

/// Change an employee's hourly wage, keeping a history row
#[utoipa::path(
    put,
    path = "/api/admin/users/{id}/wage",
    request_body = ChangeWage,
    params(("id", description = "User ID")),
    responses(
        (status = 200, description = "Wage updated"),
        (status = 404, description = "User not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Admin"
)]
pub async fn change_wage(
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    payload: web::Json<ChangeWage>,
) -> impl Responder {
    let id = path.into_inner();

    // The wage column and its history row must move together; a dropped
    // transaction rolls the wage change back.
    let mut tx = match pool.begin().await {
        Ok(tx) => tx,
        Err(e) => {
            error!(error = %e, id, "Failed to begin wage transaction");
            return HttpResponse::InternalServerError().json(json!({
                "message": "Internal Server Error"
            }));
        }
    };

    let previous: Result<Option<Option<f64>>, sqlx::Error> =
        sqlx::query_scalar("SELECT wage FROM users WHERE id = ? FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await;

    let previous_wage = match previous {
        Ok(Some(wage)) => wage,
        Ok(None) => {
            return HttpResponse::NotFound().json(json!({
                "message": "User not found"
            }));
        }
        Err(e) => {
            error!(error = %e, id, "Failed to read current wage");
            return HttpResponse::InternalServerError().json(json!({
                "message": "Internal Server Error"
            }));
        }
    };

    let update = sqlx::query("UPDATE users SET wage = ? WHERE id = ?")
        .bind(payload.new_wage)
        .bind(id)
        .execute(&mut *tx)
        .await;
    if let Err(e) = update {
        error!(error = %e, id, "Failed to update wage");
        return HttpResponse::InternalServerError().json(json!({
            "message": "Internal Server Error"
        }));
    }

    let history = sqlx::query(
        "INSERT INTO wage_history (user_id, previous_wage, new_wage) VALUES (?, ?, ?)",
    )
    .bind(id)
    .bind(previous_wage)
    .bind(payload.new_wage)
    .execute(&mut *tx)
    .await;
    if let Err(e) = history {
        error!(error = %e, id, "Failed to record wage history");
        return HttpResponse::InternalServerError().json(json!({
            "message": "Internal Server Error"
        }));
    }

    if let Err(e) = tx.commit().await {
        error!(error = %e, id, "Failed to commit wage transaction");
        return HttpResponse::InternalServerError().json(json!({
            "message": "Internal Server Error"
        }));
    }

    HttpResponse::Ok().json(json!({
        "message": "Wage updated successfully"
    }))
}

/// Delete an employee together with their attendance records
#[utoipa::path(
    delete,
    path = "/api/admin/users/{id}",
    params(("id", description = "User ID")),
    responses(
        (status = 200, description = "User and records deleted"),
        (status = 404, description = "User not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Admin"
)]
pub async fn delete_user(pool: web::Data<MySqlPool>, path: web::Path<u64>) -> impl Responder {
    let id = path.into_inner();

    let mut tx = match pool.begin().await {
        Ok(tx) => tx,
        Err(e) => {
            error!(error = %e, id, "Failed to begin delete transaction");
            return HttpResponse::InternalServerError().json(json!({
                "message": "Internal Server Error"
            }));
        }
    };

    let username: Result<Option<String>, sqlx::Error> =
        sqlx::query_scalar("SELECT username FROM users WHERE id = ? FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await;

    let username = match username {
        Ok(Some(u)) => u,
        Ok(None) => {
            return HttpResponse::NotFound().json(json!({
                "message": "User not found"
            }));
        }
        Err(e) => {
            error!(error = %e, id, "Failed to look up user");
            return HttpResponse::InternalServerError().json(json!({
                "message": "Internal Server Error"
            }));
        }
    };

    let records = sqlx::query("DELETE FROM work_records WHERE username = ?")
        .bind(&username)
        .execute(&mut *tx)
        .await;
    if let Err(e) = records {
        error!(error = %e, username, "Failed to delete work records");
        return HttpResponse::InternalServerError().json(json!({
            "message": "Internal Server Error"
        }));
    }

    let user = sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await;
    if let Err(e) = user {
        error!(error = %e, id, "Failed to delete user");
        return HttpResponse::InternalServerError().json(json!({
            "message": "Internal Server Error"
        }));
    }

    if let Err(e) = tx.commit().await {
        error!(error = %e, id, "Failed to commit delete transaction");
        return HttpResponse::InternalServerError().json(json!({
            "message": "Internal Server Error"
        }));
    }

    HttpResponse::Ok().json(json!({
        "message": "User and attendance records deleted"
    }))
}

#[derive(Serialize, sqlx::FromRow, ToSchema)]
pub struct UserSummary {
    pub name: String,
    pub username: String,
}

/// List employees assigned to a location
#[utoipa::path(
    get,
    path = "/api/admin/users/by-location/{location}",
    params(("location", description = "Location name")),
    responses(
        (status = 200, description = "Employees at the location", body = [UserSummary]),
        (status = 500, description = "Internal server error")
    ),
    tag = "Admin"
)]
pub async fn users_by_location(
    pool: web::Data<MySqlPool>,
    path: web::Path<String>,
) -> impl Responder {
    let location = path.into_inner();

    let result =
        sqlx::query_as::<_, UserSummary>("SELECT name, username FROM users WHERE location = ?")
            .bind(&location)
            .fetch_all(pool.get_ref())
            .await;

    match result {
        Ok(users) => HttpResponse::Ok().json(users),
        Err(e) => {
            error!(error = %e, location, "Failed to list users by location");
            HttpResponse::InternalServerError().json(json!({
                "message": "Internal Server Error"
            }))
        }
    }
}
