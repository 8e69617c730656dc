//! Capabilities the gateway is built from. Read-only queries, privileged
//! writes and the photo bucket are separate so each can be backed by a
//! differently-scoped credential.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::gateway::error::GatewayError;
use crate::model::{
    attendance::AttendanceRecord,
    jam_settings::{JamSettings, SettingsPolicy},
    student::{NewStudent, Student},
};

#[async_trait]
pub trait RecordReader: Send + Sync {
    async fn find_student(&self, nim: &str, password: &str)
    -> Result<Option<Student>, GatewayError>;

    async fn admin_matches(&self, username: &str, password: &str) -> Result<bool, GatewayError>;

    /// All records, newest first.
    async fn list_records(&self) -> Result<Vec<AttendanceRecord>, GatewayError>;

    /// Records of one student, newest first, optionally limited to one day.
    async fn list_records_for(
        &self,
        nim: &str,
        on: Option<NaiveDate>,
    ) -> Result<Vec<AttendanceRecord>, GatewayError>;

    /// `None` when the record does not exist, `Some(None)` when it has no photo.
    async fn photo_path_of(&self, id: &str) -> Result<Option<Option<String>>, GatewayError>;

    async fn latest_settings(&self) -> Result<Option<JamSettings>, GatewayError>;

    /// Ordered by `nama`.
    async fn list_students(&self) -> Result<Vec<Student>, GatewayError>;
}

#[async_trait]
pub trait RecordWriter: Send + Sync {
    async fn insert_record(&self, record: &AttendanceRecord) -> Result<(), GatewayError>;

    /// Returns the number of rows removed.
    async fn delete_record(&self, id: &str) -> Result<u64, GatewayError>;

    async fn save_settings(
        &self,
        settings: &JamSettings,
        policy: SettingsPolicy,
    ) -> Result<(), GatewayError>;

    async fn insert_student(&self, student: &NewStudent) -> Result<(), GatewayError>;

    async fn delete_student(&self, nim: &str) -> Result<u64, GatewayError>;
}

#[async_trait]
pub trait PhotoBucket: Send + Sync {
    /// Fails with `GatewayError::Duplicate` when `name` is already taken.
    async fn upload(&self, name: &str, bytes: Vec<u8>) -> Result<(), GatewayError>;

    async fn remove(&self, name: &str) -> Result<(), GatewayError>;

    fn public_url(&self, name: &str) -> String;
}
