use crate::{
    auth::{auth::AuthUser, jwt::generate_access_token},
    config::Config,
    gateway::Gateway,
    model::role::Role,
    models::{AdminLoginReq, LoginResponse, StudentLoginReq},
    utils::token_revocation::TokenRevocations,
};
use actix_web::{HttpResponse, Responder, web};
use serde_json::json;
use tracing::{debug, error, info, instrument};

fn issue_token(
    subject: String,
    role: Role,
    profile: Option<crate::model::student::Student>,
    user_info: serde_json::Value,
    config: &Config,
) -> HttpResponse {
    match generate_access_token(subject, role, profile, &config.jwt_secret, config.access_token_ttl) {
        Ok((access_token, claims)) => {
            debug!(jti = %claims.jti, "Access token issued");
            HttpResponse::Ok().json(LoginResponse {
                access_token,
                role,
                user_info,
            })
        }
        Err(e) => {
            error!(error = %e, "Failed to sign access token");
            HttpResponse::InternalServerError().finish()
        }
    }
}

/// Student login
#[utoipa::path(
    post,
    path = "/auth/login/mahasiswa",
    request_body = StudentLoginReq,
    responses(
        (status = 200, description = "Logged in", body = LoginResponse),
        (status = 400, description = "NIM or password empty"),
        (status = 401, description = "Invalid credentials", body = Object, example = json!({
            "message": "NIM atau password salah."
        })),
        (status = 502, description = "Backend unavailable")
    ),
    tag = "Auth"
)]
#[instrument(
    name = "auth_login_mahasiswa",
    skip(gateway, config, user),
    fields(nim = %user.nim.trim())
)]
pub async fn login_mahasiswa(
    user: web::Json<StudentLoginReq>,
    gateway: web::Data<Gateway>,
    config: web::Data<Config>,
) -> impl Responder {
    info!("Login request received");

    let nim = user.nim.trim();
    if nim.is_empty() || user.password.is_empty() {
        info!("Validation failed: empty nim or password");
        return HttpResponse::BadRequest().json(json!({
            "message": "NIM dan password wajib diisi."
        }));
    }

    let student = match gateway.validate_student(nim, &user.password).await {
        Ok(Some(student)) => student,
        Ok(None) => {
            info!("Invalid credentials");
            return HttpResponse::Unauthorized().json(json!({
                "message": "NIM atau password salah."
            }));
        }
        Err(e) => {
            return HttpResponse::BadGateway().json(json!({
                "message": format!("Error validasi mahasiswa: {e}")
            }));
        }
    };

    info!("Login successful");

    let user_info = json!(student);
    issue_token(
        student.nim.clone(),
        Role::Mahasiswa,
        Some(student),
        user_info,
        &config,
    )
}

/// Admin login
#[utoipa::path(
    post,
    path = "/auth/login/admin",
    request_body = AdminLoginReq,
    responses(
        (status = 200, description = "Logged in", body = LoginResponse),
        (status = 400, description = "Username or password empty"),
        (status = 401, description = "Invalid credentials", body = Object, example = json!({
            "message": "Username/password salah."
        })),
        (status = 502, description = "Backend unavailable")
    ),
    tag = "Auth"
)]
#[instrument(
    name = "auth_login_admin",
    skip(gateway, config, user),
    fields(username = %user.username.trim())
)]
pub async fn login_admin(
    user: web::Json<AdminLoginReq>,
    gateway: web::Data<Gateway>,
    config: web::Data<Config>,
) -> impl Responder {
    info!("Login request received");

    let username = user.username.trim();
    let password = user.password.trim();
    if username.is_empty() || password.is_empty() {
        info!("Validation failed: empty username or password");
        return HttpResponse::BadRequest().json(json!({
            "message": "Username dan password wajib diisi."
        }));
    }

    match gateway.validate_admin(username, password).await {
        Ok(true) => {
            info!("Login successful");
            issue_token(
                username.to_string(),
                Role::Admin,
                None,
                json!({ "username": username }),
                &config,
            )
        }
        Ok(false) => {
            info!("Invalid credentials");
            HttpResponse::Unauthorized().json(json!({
                "message": "Username/password salah."
            }))
        }
        Err(e) => HttpResponse::BadGateway().json(json!({
            "message": format!("Error validasi admin: {e}")
        })),
    }
}

/// Ends the session carried by the bearer token. Always succeeds.
#[utoipa::path(
    post,
    path = "/auth/logout",
    responses((status = 204, description = "Session cleared")),
    security(("bearer_auth" = [])),
    tag = "Auth"
)]
pub async fn logout(
    auth: Option<AuthUser>,
    revocations: web::Data<TokenRevocations>,
) -> impl Responder {
    if let Some(user) = auth {
        revocations.revoke(&user.jti).await;
        info!(subject = %user.subject, role = %user.role, "Logged out");
    }

    HttpResponse::NoContent().finish()
}
