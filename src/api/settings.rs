use crate::{
    auth::auth::AuthUser,
    gateway::{Gateway, error::GatewayError},
    model::jam_settings::{JamSettings, UpdateJamSettings},
    utils::time_window::parse_time,
};
use actix_web::{HttpResponse, Responder, web};
use serde_json::json;
use tracing::info;

/// Current cutoff times
#[utoipa::path(
    get,
    path = "/api/student/settings",
    responses((status = 200, description = "Current jam settings", body = JamSettings)),
    security(("bearer_auth" = [])),
    tag = "Settings"
)]
pub async fn get_settings(_auth: AuthUser, gateway: web::Data<Gateway>) -> impl Responder {
    HttpResponse::Ok().json(gateway.get_jam_settings().await)
}

/// Current cutoff times (admin view)
#[utoipa::path(
    get,
    path = "/api/admin/settings",
    responses((status = 200, description = "Current jam settings", body = JamSettings)),
    security(("bearer_auth" = [])),
    tag = "Settings"
)]
pub async fn get_admin_settings(
    auth: AuthUser,
    gateway: web::Data<Gateway>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;
    Ok(HttpResponse::Ok().json(gateway.get_jam_settings().await))
}

/// Save new cutoff times
#[utoipa::path(
    put,
    path = "/api/admin/settings",
    request_body = UpdateJamSettings,
    responses(
        (status = 200, description = "Saved", body = Object, example = json!({
            "message": "Pengaturan jam disimpan."
        })),
        (status = 400, description = "Malformed time or jam_pulang not after jam_masuk"),
        (status = 502, description = "Backend unavailable")
    ),
    security(("bearer_auth" = [])),
    tag = "Settings"
)]
pub async fn update_settings(
    auth: AuthUser,
    gateway: web::Data<Gateway>,
    payload: web::Json<UpdateJamSettings>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let malformed = || GatewayError::Validation("Format jam harus HH:MM:SS.".to_string());
    let settings = JamSettings {
        jam_masuk: parse_time(&payload.jam_masuk).map_err(|_| malformed())?,
        jam_pulang: parse_time(&payload.jam_pulang).map_err(|_| malformed())?,
    };

    gateway.update_jam_settings(&settings).await?;
    info!(by = %auth.subject, jam_masuk = %payload.jam_masuk, jam_pulang = %payload.jam_pulang, "Jam settings updated");

    Ok(HttpResponse::Ok().json(json!({
        "message": "Pengaturan jam disimpan."
    })))
}
