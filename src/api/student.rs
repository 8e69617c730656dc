use crate::{
    auth::auth::AuthUser,
    gateway::{Gateway, error::GatewayError},
    model::student::{NewStudent, Student},
};
use actix_web::{HttpResponse, Responder, web};
use serde::Serialize;
use serde_json::json;
use utoipa::ToSchema;

#[derive(Serialize, ToSchema)]
pub struct StudentListResponse {
    pub data: Vec<Student>,
    #[schema(example = "Belum ada data mahasiswa.")]
    pub message: Option<String>,
}

/// List students ordered by name
#[utoipa::path(
    get,
    path = "/api/admin/students",
    responses(
        (status = 200, description = "Students (possibly empty)", body = StudentListResponse),
        (status = 403, description = "Forbidden"),
        (status = 502, description = "Backend unavailable")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn list_students(
    auth: AuthUser,
    gateway: web::Data<Gateway>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let students = gateway.list_students().await?;
    let message = students
        .is_empty()
        .then(|| "Belum ada data mahasiswa.".to_string());

    Ok(HttpResponse::Ok().json(StudentListResponse {
        data: students,
        message,
    }))
}

/// Add a student
#[utoipa::path(
    post,
    path = "/api/admin/students",
    request_body = NewStudent,
    responses(
        (status = 201, description = "Student added", body = Object, example = json!({
            "message": "Mahasiswa ditambahkan."
        })),
        (status = 400, description = "Empty field"),
        (status = 409, description = "NIM already exists", body = Object, example = json!({
            "message": "NIM sudah ada. Gunakan NIM yang berbeda."
        })),
        (status = 502, description = "Backend unavailable")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn add_student(
    auth: AuthUser,
    gateway: web::Data<Gateway>,
    payload: web::Json<NewStudent>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    if payload.has_empty_field() {
        return Err(GatewayError::Validation("NIM, nama, jurusan dan password wajib diisi.".to_string()).into());
    }

    gateway.add_student(&payload.trimmed()).await?;

    Ok(HttpResponse::Created().json(json!({
        "message": "Mahasiswa ditambahkan."
    })))
}

/// Delete a student by NIM
#[utoipa::path(
    delete,
    path = "/api/admin/students/{nim}",
    params(("nim", Path, description = "Student NIM")),
    responses(
        (status = 200, description = "Deleted"),
        (status = 404, description = "Student not found"),
        (status = 502, description = "Backend unavailable")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn delete_student(
    auth: AuthUser,
    gateway: web::Data<Gateway>,
    path: web::Path<String>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;
    let nim = path.into_inner();

    if gateway.delete_student(&nim).await? {
        Ok(HttpResponse::Ok().json(json!({
            "message": "Mahasiswa dihapus."
        })))
    } else {
        Ok(HttpResponse::NotFound().json(json!({
            "message": "Mahasiswa tidak ditemukan."
        })))
    }
}
