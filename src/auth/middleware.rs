use crate::auth::auth::authenticate;
use crate::model::role::Role;
use actix_web::middleware::Next;
use actix_web::{
    Error, HttpMessage, HttpResponse,
    body::BoxBody,
    dev::{ServiceRequest, ServiceResponse},
};
use serde_json::json;

async fn require_role(
    req: ServiceRequest,
    next: Next<BoxBody>,
    role: Role,
) -> Result<ServiceResponse<BoxBody>, Error> {
    let auth_user = match authenticate(req.request()) {
        Ok(user) => user,
        Err(e) => {
            let resp = HttpResponse::Unauthorized().json(json!({
                "error": "Invalid or expired token",
                "details": e.to_string()
            }));
            return Ok(req.into_response(resp.map_into_boxed_body()));
        }
    };

    if auth_user.role != role {
        let resp = HttpResponse::Forbidden().json(json!({"error": format!("{role} only")}));
        return Ok(req.into_response(resp.map_into_boxed_body()));
    }

    req.extensions_mut().insert(auth_user);

    next.call(req).await
}

pub async fn student_middleware(
    req: ServiceRequest,
    next: Next<BoxBody>,
) -> Result<ServiceResponse<BoxBody>, Error> {
    require_role(req, next, Role::Mahasiswa).await
}

pub async fn admin_middleware(
    req: ServiceRequest,
    next: Next<BoxBody>,
) -> Result<ServiceResponse<BoxBody>, Error> {
    require_role(req, next, Role::Admin).await
}
