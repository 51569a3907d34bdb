use crate::api::attendance::{ClockRequest, StatusRequest};
use crate::api::employee::{ChangeWage, UpdateUser, UserResponse, UserSummary};
use crate::api::location::{CreateLocation, Location};
use crate::api::record::{InsertRecord, SummaryQuery, SummaryRow, UpdateRecord};
use crate::model::employee::Employee;
use crate::model::work_record::{Annotation, WorkRecord};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Punchclock API",
        version = "1.0.0",
        description = r#"
## Attendance tracking service

Employees clock in and out of contracted shifts; closed shifts are
reconciled into billable half-hour totals with a review annotation.
Administrators manage employees, pay rates and locations, correct
records, and pull monthly timesheets.

Two background sweeps keep the books consistent: absentees are recorded
once their shift end has passed, and shifts left open too long are
force-closed with full contracted credit and flagged for review.
"#,
    ),
    paths(
        crate::api::attendance::clock_in,
        crate::api::attendance::clock_out,
        crate::api::attendance::status,

        crate::api::employee::list_users,
        crate::api::employee::update_user,
        crate::api::employee::change_wage,
        crate::api::employee::delete_user,
        crate::api::employee::users_by_location,

        crate::api::location::list_locations,
        crate::api::location::create_location,
        crate::api::location::delete_location,

        crate::api::record::work_summary,
        crate::api::record::update_record,
        crate::api::record::insert_record,
        crate::api::record::delete_record
    ),
    components(
        schemas(
            ClockRequest,
            StatusRequest,
            WorkRecord,
            Annotation,
            Employee,
            UserResponse,
            UserSummary,
            UpdateUser,
            ChangeWage,
            Location,
            CreateLocation,
            SummaryQuery,
            SummaryRow,
            UpdateRecord,
            InsertRecord
        )
    ),
    tags(
        (name = "Work", description = "Clock-in/out and shift status"),
        (name = "Admin", description = "Employee, location and record administration"),
    )
)]
pub struct ApiDoc;
