use crate::{
    auth::auth::AuthUser,
    config::Config,
    gateway::{Gateway, error::GatewayError},
    model::{
        attendance::{AdminAttendanceEntry, AttendanceRecord, HistoryEntry},
        jam_settings::JamSettings,
        location::Coordinates,
        student::Student,
    },
    utils::{
        location_cache::LocationSlots,
        time_format,
        time_window::{determine_attendance_status, determine_late_status},
    },
};
use actix_web::{HttpResponse, Responder, web};
use chrono::{Local, NaiveDateTime, Timelike};
use serde::Serialize;
use serde_json::json;
use tracing::{error, info};
use utoipa::ToSchema;
use uuid::Uuid;

pub const NO_LOCATION_MESSAGE: &str =
    "Lokasi GPS tidak ditemukan. Klik 'Get Location' dan izinkan akses.";
pub const NO_PHOTO_MESSAGE: &str = "Ambil foto terlebih dahulu.";
pub const EMPTY_HISTORY_MESSAGE: &str = "Belum ada riwayat absensi.";
pub const EMPTY_RECORDS_MESSAGE: &str = "Belum ada data absensi.";

/// Object name of a check-in photo.
pub fn photo_file_name(nim: &str, at: &NaiveDateTime) -> String {
    format!("{}_{}.jpg", nim, at.format("%Y%m%d_%H%M%S"))
}

/// Validates a submission, uploads the photo and stores the record.
///
/// Nothing remote is touched until validation passes. The photo is uploaded
/// first; if that fails no record is written. `now` is truncated to whole
/// seconds before it is classified or stored.
pub async fn submit_check_in(
    gateway: &Gateway,
    student: &Student,
    photo: Vec<u8>,
    location: Option<Coordinates>,
    require_location: bool,
    now: NaiveDateTime,
) -> Result<AttendanceRecord, GatewayError> {
    if require_location && location.is_none() {
        return Err(GatewayError::Validation(NO_LOCATION_MESSAGE.to_string()));
    }
    if photo.is_empty() {
        return Err(GatewayError::Validation(NO_PHOTO_MESSAGE.to_string()));
    }

    let now = now.with_nanosecond(0).unwrap_or(now);
    let settings = gateway.get_jam_settings().await;
    let file_name = photo_file_name(&student.nim, &now);
    let photo_url = gateway.upload_photo(photo, &file_name).await?;

    let current = now.time();
    let record = AttendanceRecord {
        id: Uuid::new_v4().to_string(),
        nim: student.nim.clone(),
        nama: student.nama.clone(),
        jurusan: student.jurusan.clone(),
        timestamp: now,
        photo_path: Some(photo_url),
        status: determine_attendance_status(current, settings.jam_masuk, settings.jam_pulang),
        late_status: determine_late_status(current, settings.jam_masuk),
        latitude: location.map(|c| c.latitude),
        longitude: location.map(|c| c.longitude),
    };

    gateway.insert_attendance(&record).await?;

    info!(
        id = %record.id,
        nim = %record.nim,
        status = %record.status,
        late_status = %record.late_status,
        "Attendance recorded"
    );
    Ok(record)
}

#[derive(Serialize, ToSchema)]
pub struct CheckInResponse {
    #[schema(example = "Absensi berhasil! Lokasi: -6.2, 106.816666")]
    pub message: String,
    pub data: AttendanceRecord,
}

/// Submit attendance (body: JPEG photo)
#[utoipa::path(
    post,
    path = "/api/student/attendance",
    request_body(content = Vec<u8>, content_type = "image/jpeg", description = "Camera photo"),
    responses(
        (status = 201, description = "Attendance recorded", body = CheckInResponse),
        (status = 400, description = "Missing photo or location", body = Object, example = json!({
            "message": "Ambil foto terlebih dahulu."
        })),
        (status = 401, description = "Unauthorized"),
        (status = 502, description = "Upload or insert failed")
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
pub async fn check_in(
    auth: AuthUser,
    body: web::Bytes,
    gateway: web::Data<Gateway>,
    slots: web::Data<LocationSlots>,
    config: web::Data<Config>,
) -> actix_web::Result<impl Responder> {
    let student = auth.student()?;
    let location = slots.state(&student.nim).await.coordinates();
    let now = Local::now().naive_local();

    let record = submit_check_in(
        gateway.get_ref(),
        student,
        body.to_vec(),
        location,
        config.require_location,
        now,
    )
    .await?;
    // each check-in needs a fresh fix
    slots.clear(&student.nim).await;

    let message = match (record.latitude, record.longitude) {
        (Some(lat), Some(lon)) => format!("Absensi berhasil! Lokasi: {}, {}", lat, lon),
        _ => "Absensi berhasil!".to_string(),
    };

    Ok(HttpResponse::Created().json(CheckInResponse {
        message,
        data: record,
    }))
}

#[derive(Serialize, ToSchema)]
pub struct HistoryResponse {
    pub data: Vec<HistoryEntry>,
    #[schema(example = "Belum ada riwayat absensi.")]
    pub message: Option<String>,
}

/// Own attendance history, newest first
#[utoipa::path(
    get,
    path = "/api/student/attendance",
    responses(
        (status = 200, description = "History (possibly empty)", body = HistoryResponse),
        (status = 401, description = "Unauthorized"),
        (status = 502, description = "Backend unavailable", body = HistoryResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
pub async fn my_history(
    auth: AuthUser,
    gateway: web::Data<Gateway>,
) -> actix_web::Result<impl Responder> {
    let student = auth.student()?;

    let response = match gateway.fetch_student_records(&student.nim).await {
        Ok(records) if records.is_empty() => HttpResponse::Ok().json(HistoryResponse {
            data: Vec::new(),
            message: Some(EMPTY_HISTORY_MESSAGE.to_string()),
        }),
        Ok(records) => HttpResponse::Ok().json(HistoryResponse {
            data: records.iter().map(HistoryEntry::from).collect(),
            message: None,
        }),
        Err(e) => HttpResponse::BadGateway().json(HistoryResponse {
            data: Vec::new(),
            message: Some(format!("Error mengambil data absensi: {e}")),
        }),
    };

    Ok(response)
}

#[derive(Serialize, ToSchema)]
pub struct DashboardResponse {
    #[schema(example = "07:42:10")]
    pub time: String,
    #[schema(example = "Monday, 02 March 2026")]
    pub date: String,
    pub jam_settings: JamSettings,
    /// today's submissions of this student
    pub today: Vec<HistoryEntry>,
}

/// Student dashboard
#[utoipa::path(
    get,
    path = "/api/student/dashboard",
    responses(
        (status = 200, description = "Clock, cutoff times and today's records", body = DashboardResponse),
        (status = 401, description = "Unauthorized"),
        (status = 502, description = "Backend unavailable")
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
pub async fn dashboard(
    auth: AuthUser,
    gateway: web::Data<Gateway>,
) -> actix_web::Result<impl Responder> {
    let student = auth.student()?;
    let now = Local::now().naive_local();

    let view = dashboard_view(gateway.get_ref(), student, now).await?;
    Ok(HttpResponse::Ok().json(view))
}

/// Clock, cutoff times and the student's records for the day of `now`.
pub async fn dashboard_view(
    gateway: &Gateway,
    student: &Student,
    now: NaiveDateTime,
) -> Result<DashboardResponse, GatewayError> {
    let jam_settings = gateway.get_jam_settings().await;
    let today = gateway
        .fetch_student_records_on(&student.nim, now.date())
        .await?;

    Ok(DashboardResponse {
        time: time_format::format_time(&now.time()),
        date: now.format("%A, %d %B %Y").to_string(),
        jam_settings,
        today: today.iter().map(HistoryEntry::from).collect(),
    })
}

#[derive(Serialize, ToSchema)]
pub struct AdminRecordsResponse {
    pub data: Vec<AdminAttendanceEntry>,
    #[schema(example = "Belum ada data absensi.")]
    pub message: Option<String>,
}

/// All attendance records, newest first
#[utoipa::path(
    get,
    path = "/api/admin/attendance",
    responses(
        (status = 200, description = "All records (possibly empty)", body = AdminRecordsResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 502, description = "Backend unavailable", body = AdminRecordsResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn list_records(
    auth: AuthUser,
    gateway: web::Data<Gateway>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let response = match gateway.fetch_all_records().await {
        Ok(records) if records.is_empty() => HttpResponse::Ok().json(AdminRecordsResponse {
            data: Vec::new(),
            message: Some(EMPTY_RECORDS_MESSAGE.to_string()),
        }),
        Ok(records) => HttpResponse::Ok().json(AdminRecordsResponse {
            data: records.into_iter().map(AdminAttendanceEntry::from).collect(),
            message: None,
        }),
        Err(e) => HttpResponse::BadGateway().json(AdminRecordsResponse {
            data: Vec::new(),
            message: Some(format!("Error mengambil data absensi: {e}")),
        }),
    };

    Ok(response)
}

/// Delete an attendance record and its photo
#[utoipa::path(
    delete,
    path = "/api/admin/attendance/{id}",
    params(("id", Path, description = "Attendance record id")),
    responses(
        (status = 200, description = "Deleted", body = Object, example = json!({
            "message": "Record absensi dihapus."
        })),
        (status = 404, description = "Record not found"),
        (status = 502, description = "Backend unavailable")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn delete_record(
    auth: AuthUser,
    gateway: web::Data<Gateway>,
    path: web::Path<String>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;
    let id = path.into_inner();

    match gateway.delete_record(&id).await {
        Ok(true) => Ok(HttpResponse::Ok().json(json!({
            "message": "Record absensi dihapus."
        }))),
        Ok(false) => Ok(HttpResponse::NotFound().json(json!({
            "message": "Record absensi tidak ditemukan."
        }))),
        Err(e) => {
            error!(error = %e, id = %id, "Delete record failed");
            Err(e.into())
        }
    }
}
