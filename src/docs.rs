use crate::api::attendance::{
    AdminRecordsResponse, CheckInResponse, DashboardResponse, HistoryResponse,
};
use crate::api::location::LocationRequested;
use crate::api::page::{MenuItem, View};
use crate::api::student::StudentListResponse;
use crate::model::attendance::{
    AdminAttendanceEntry, AttendanceRecord, AttendanceStatus, HistoryEntry, LateStatus,
};
use crate::model::jam_settings::{JamSettings, UpdateJamSettings};
use crate::model::location::{
    Coordinates, GeoError, GeolocationOptions, LocationReport, LocationState,
};
use crate::model::role::Role;
use crate::model::student::{NewStudent, Student};
use crate::models::{AdminLoginReq, LoginResponse, StudentLoginReq};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi, openapi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Absensi Mahasiswa API",
        version = "1.0.0",
        description = r#"
## Student Attendance

Students check in with a camera photo and their browser location. Each
submission is classified as **Masuk** or **Pulang** and as late or on time
against the configured cutoff times.

### Roles
- **mahasiswa**: dashboard, check-in, own history, location handshake
- **admin**: all records, record deletion, student accounts, cutoff times

### Security
Log in through `/auth/login/mahasiswa` or `/auth/login/admin` and send the
returned token as `Authorization: Bearer <token>`.
"#,
    ),
    paths(
        crate::api::page::index,

        crate::auth::handlers::login_mahasiswa,
        crate::auth::handlers::login_admin,
        crate::auth::handlers::logout,

        crate::api::attendance::dashboard,
        crate::api::attendance::check_in,
        crate::api::attendance::my_history,
        crate::api::attendance::list_records,
        crate::api::attendance::delete_record,

        crate::api::location::request_location,
        crate::api::location::report_location,
        crate::api::location::location_state,

        crate::api::settings::get_settings,
        crate::api::settings::get_admin_settings,
        crate::api::settings::update_settings,

        crate::api::student::list_students,
        crate::api::student::add_student,
        crate::api::student::delete_student
    ),
    components(
        schemas(
            StudentLoginReq,
            AdminLoginReq,
            LoginResponse,
            Role,
            Student,
            NewStudent,
            StudentListResponse,
            AttendanceStatus,
            LateStatus,
            AttendanceRecord,
            HistoryEntry,
            AdminAttendanceEntry,
            CheckInResponse,
            HistoryResponse,
            DashboardResponse,
            AdminRecordsResponse,
            JamSettings,
            UpdateJamSettings,
            Coordinates,
            GeoError,
            LocationReport,
            LocationState,
            GeolocationOptions,
            LocationRequested,
            MenuItem,
            View
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "Page", description = "Session-driven view dispatch"),
        (name = "Auth", description = "Login and logout"),
        (name = "Attendance", description = "Check-in and attendance history"),
        (name = "Location", description = "Browser geolocation handshake"),
        (name = "Settings", description = "Jam masuk / jam pulang cutoffs"),
        (name = "Admin", description = "Record and student administration"),
    )
)]
pub struct ApiDoc;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_lists_both_role_scopes() {
        let doc = ApiDoc::openapi();
        let paths = &doc.paths.paths;

        assert!(paths.contains_key("/auth/login/mahasiswa"));
        assert!(paths.contains_key("/api/student/attendance"));
        assert!(paths.contains_key("/api/admin/students/{nim}"));
        assert!(
            doc.components
                .as_ref()
                .is_some_and(|c| c.security_schemes.contains_key("bearer_auth"))
        );
    }
}
