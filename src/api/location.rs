use actix_web::{HttpResponse, Responder, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::MySqlPool;
use tracing::error;
use utoipa::ToSchema;

#[derive(Serialize, sqlx::FromRow, ToSchema)]
pub struct Location {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = "Gangnam")]
    pub name: String,
}

#[derive(Deserialize, ToSchema)]
pub struct CreateLocation {
    #[schema(example = "Gangnam")]
    pub name: String,
}

/// List locations
#[utoipa::path(
    get,
    path = "/api/admin/locations",
    responses(
        (status = 200, description = "Location list", body = [Location]),
        (status = 500, description = "Internal server error")
    ),
    tag = "Admin"
)]
pub async fn list_locations(pool: web::Data<MySqlPool>) -> impl Responder {
    let result = sqlx::query_as::<_, Location>("SELECT id, name FROM locations")
        .fetch_all(pool.get_ref())
        .await;

    match result {
        Ok(locations) => HttpResponse::Ok().json(locations),
        Err(e) => {
            error!(error = %e, "Failed to list locations");
            HttpResponse::InternalServerError().json(json!({
                "message": "Internal Server Error"
            }))
        }
    }
}

/// Add a location
#[utoipa::path(
    post,
    path = "/api/admin/locations",
    request_body = CreateLocation,
    responses(
        (status = 201, description = "Location created"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Admin"
)]
pub async fn create_location(
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateLocation>,
) -> impl Responder {
    let result = sqlx::query("INSERT INTO locations (name) VALUES (?)")
        .bind(&payload.name)
        .execute(pool.get_ref())
        .await;

    match result {
        Ok(_) => HttpResponse::Created().json(json!({
            "message": "Location created"
        })),
        Err(e) => {
            error!(error = %e, name = %payload.name, "Failed to create location");
            HttpResponse::InternalServerError().json(json!({
                "message": "Internal Server Error"
            }))
        }
    }
}

/// Delete a location
#[utoipa::path(
    delete,
    path = "/api/admin/locations/{id}",
    params(("id", description = "Location ID")),
    responses(
        (status = 200, description = "Location deleted"),
        (status = 404, description = "Location not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Admin"
)]
pub async fn delete_location(pool: web::Data<MySqlPool>, path: web::Path<u64>) -> impl Responder {
    let id = path.into_inner();

    let result = sqlx::query("DELETE FROM locations WHERE id = ?")
        .bind(id)
        .execute(pool.get_ref())
        .await;

    match result {
        Ok(r) if r.rows_affected() == 0 => HttpResponse::NotFound().json(json!({
            "message": "Location not found"
        })),
        Ok(_) => HttpResponse::Ok().json(json!({
            "message": "Location deleted"
        })),
        Err(e) => {
            error!(error = %e, id, "Failed to delete location");
            HttpResponse::InternalServerError().json(json!({
                "message": "Internal Server Error"
            }))
        }
    }
}
