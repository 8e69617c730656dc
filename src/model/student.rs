use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Student identity as exposed to the rest of the service. The stored
/// password never leaves the database layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(example = json!({
    "nim": "2201001",
    "nama": "Budi Santoso",
    "jurusan": "Teknik Informatika"
}))]
pub struct Student {
    #[schema(example = "2201001")]
    pub nim: String,
    #[schema(example = "Budi Santoso")]
    pub nama: String,
    #[schema(example = "Teknik Informatika")]
    pub jurusan: String,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct NewStudent {
    #[schema(example = "2201001")]
    pub nim: String,
    #[schema(example = "Budi Santoso")]
    pub nama: String,
    #[schema(example = "Teknik Informatika")]
    pub jurusan: String,
    #[schema(example = "rahasia")]
    pub password: String,
}

impl NewStudent {
    pub fn trimmed(&self) -> Self {
        Self {
            nim: self.nim.trim().to_string(),
            nama: self.nama.trim().to_string(),
            jurusan: self.jurusan.trim().to_string(),
            password: self.password.clone(),
        }
    }

    pub fn has_empty_field(&self) -> bool {
        self.nim.trim().is_empty()
            || self.nama.trim().is_empty()
            || self.jurusan.trim().is_empty()
            || self.password.is_empty()
    }
}
