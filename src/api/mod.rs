pub mod attendance;
pub mod employee;
pub mod location;
pub mod record;

use actix_web::HttpResponse;
use serde_json::json;
use tracing::error;

use crate::service::lifecycle::LifecycleError;

/// Maps the lifecycle error taxonomy onto HTTP responses. Storage failures
/// are logged here and surfaced as an opaque 500.
pub(crate) fn lifecycle_error_response(
    e: &LifecycleError,
    username: &str,
    operation: &str,
) -> HttpResponse {
    match e {
        LifecycleError::EmployeeNotFound(_) => HttpResponse::NotFound().json(json!({
            "message": "Employee not found"
        })),
        LifecycleError::NoOpenRecord(_) => HttpResponse::NotFound().json(json!({
            "message": "No active clock-in found"
        })),
        LifecycleError::NoContractWindow(_) => HttpResponse::Conflict().json(json!({
            "message": "No contract window on file"
        })),
        LifecycleError::Store(e) => {
            error!(error = %e, username, operation, "storage failure");
            HttpResponse::InternalServerError().json(json!({
                "message": "Internal Server Error"
            }))
        }
    }
}
