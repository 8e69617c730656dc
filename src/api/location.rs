use crate::{
    auth::auth::AuthUser,
    model::location::{GeolocationOptions, LocationReport, LocationState},
    utils::location_cache::LocationSlots,
};
use actix_web::{HttpResponse, Responder, web};
use serde::Serialize;
use tracing::debug;
use utoipa::ToSchema;

const BRIDGE_SCRIPT: &str = include_str!("../../static/geolocation.js");

#[derive(Serialize, ToSchema)]
pub struct LocationRequested {
    pub state: LocationState,
    pub options: GeolocationOptions,
    #[schema(example = "/geolocation.js")]
    pub script: String,
}

/// Arm a new location request
#[utoipa::path(
    post,
    path = "/api/student/location/request",
    responses((status = 200, description = "Request armed; run the browser script", body = LocationRequested)),
    security(("bearer_auth" = [])),
    tag = "Location"
)]
pub async fn request_location(
    auth: AuthUser,
    slots: web::Data<LocationSlots>,
) -> actix_web::Result<impl Responder> {
    let student = auth.student()?;
    slots.begin(&student.nim).await;

    Ok(HttpResponse::Ok().json(LocationRequested {
        state: LocationState::Pending,
        options: GeolocationOptions::default(),
        script: "/geolocation.js".to_string(),
    }))
}

/// Browser callback with the position or the failure reason
#[utoipa::path(
    post,
    path = "/api/student/location",
    request_body = LocationReport,
    responses((status = 200, description = "Resolved state", body = LocationState)),
    security(("bearer_auth" = [])),
    tag = "Location"
)]
pub async fn report_location(
    auth: AuthUser,
    slots: web::Data<LocationSlots>,
    report: web::Json<LocationReport>,
) -> actix_web::Result<impl Responder> {
    let student = auth.student()?;
    let state = slots.resolve(&student.nim, report.into_inner()).await;
    debug!(nim = %student.nim, ?state, "Location resolved");

    Ok(HttpResponse::Ok().json(state))
}

/// Poll the current location state
#[utoipa::path(
    get,
    path = "/api/student/location",
    responses((status = 200, description = "pending, error or success", body = LocationState)),
    security(("bearer_auth" = [])),
    tag = "Location"
)]
pub async fn location_state(
    auth: AuthUser,
    slots: web::Data<LocationSlots>,
) -> actix_web::Result<impl Responder> {
    let student = auth.student()?;
    Ok(HttpResponse::Ok().json(slots.state(&student.nim).await))
}

pub async fn bridge_script() -> impl Responder {
    HttpResponse::Ok()
        .content_type("application/javascript; charset=utf-8")
        .body(BRIDGE_SCRIPT)
}
