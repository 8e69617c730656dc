use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::model::{role::Role, student::Student};

#[derive(Deserialize, ToSchema)]
pub struct StudentLoginReq {
    #[schema(example = "2201001")]
    pub nim: String,
    #[schema(example = "rahasia")]
    pub password: String,
}

#[derive(Deserialize, ToSchema)]
pub struct AdminLoginReq {
    #[schema(example = "admin")]
    pub username: String,
    #[schema(example = "admin123")]
    pub password: String,
}

#[derive(Serialize, ToSchema)]
pub struct LoginResponse {
    pub access_token: String,
    #[schema(value_type = String, example = "mahasiswa")]
    pub role: Role,
    /// Student profile for `mahasiswa`, `{"username"}` for `admin`.
    #[schema(value_type = Object)]
    pub user_info: serde_json::Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// NIM for students, username for admins
    pub sub: String,
    pub role: Role,
    /// Present only for students
    pub profile: Option<Student>,
    pub exp: usize,
    pub jti: String,
}
