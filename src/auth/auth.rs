use crate::auth::jwt::verify_token;
use crate::config::Config;
use crate::model::{role::Role, student::Student};
use crate::utils::token_revocation::TokenRevocations;
use actix_web::{
    FromRequest, HttpMessage, HttpRequest, dev::Payload, error::ErrorUnauthorized, web::Data,
};
use futures::future::{Ready, ready};

/// Request-scoped session: who is calling and with which role.
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// NIM for students, username for admins
    pub subject: String,
    pub role: Role,
    pub profile: Option<Student>,
    pub jti: String,
}

/// Decodes and checks the bearer token of a request.
pub fn authenticate(req: &HttpRequest) -> Result<AuthUser, actix_web::Error> {
    let token = req
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .ok_or_else(|| ErrorUnauthorized("Missing token"))?;

    let config = req
        .app_data::<Data<Config>>()
        .ok_or_else(|| actix_web::error::ErrorInternalServerError("Config missing"))?;

    let claims = verify_token(token, &config.jwt_secret).map_err(|_| ErrorUnauthorized("Invalid token"))?;

    if let Some(revocations) = req.app_data::<Data<TokenRevocations>>() {
        if revocations.is_revoked(&claims.jti) {
            return Err(ErrorUnauthorized("Session ended"));
        }
    }

    Ok(AuthUser {
        subject: claims.sub,
        role: claims.role,
        profile: claims.profile,
        jti: claims.jti,
    })
}

impl FromRequest for AuthUser {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        // already checked by the role middleware
        if let Some(user) = req.extensions().get::<AuthUser>() {
            return ready(Ok(user.clone()));
        }
        ready(authenticate(req))
    }
}

impl AuthUser {
    pub fn require_admin(&self) -> actix_web::Result<()> {
        if self.role == Role::Admin {
            Ok(())
        } else {
            Err(actix_web::error::ErrorForbidden("Admin only"))
        }
    }

    /// Student profile of a `mahasiswa` session.
    pub fn student(&self) -> actix_web::Result<&Student> {
        match (&self.role, &self.profile) {
            (Role::Mahasiswa, Some(profile)) => Ok(profile),
            _ => Err(actix_web::error::ErrorForbidden("No student profile")),
        }
    }
}
