use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Row, mysql::MySqlRow};
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

use crate::utils::time_format;

/// Check-in / check-out classification of a submission.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, Display, EnumString, ToSchema)]
pub enum AttendanceStatus {
    Masuk,
    Pulang,
}

/// Lateness relative to the configured `jam_masuk`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, Display, EnumString, ToSchema)]
pub enum LateStatus {
    Terlambat,
    #[serde(rename = "Tidak Terlambat")]
    #[strum(serialize = "Tidak Terlambat")]
    TidakTerlambat,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "id": "6c1f6f3e-3c2b-4d0a-9b57-0f3f5b1c2d4e",
    "nim": "2201001",
    "nama": "Budi Santoso",
    "jurusan": "Teknik Informatika",
    "timestamp": "2026-03-02 07:55:10",
    "photo_path": "https://project.supabase.co/storage/v1/object/public/photos/2201001_20260302_075510.jpg",
    "status": "Masuk",
    "late_status": "Tidak Terlambat",
    "latitude": -6.2,
    "longitude": 106.816666
}))]
pub struct AttendanceRecord {
    pub id: String,
    pub nim: String,
    pub nama: String,
    pub jurusan: String,
    #[serde(with = "time_format::timestamp")]
    #[schema(value_type = String, example = "2026-03-02 07:55:10")]
    pub timestamp: NaiveDateTime,
    pub photo_path: Option<String>,
    #[schema(value_type = String, example = "Masuk")]
    pub status: AttendanceStatus,
    #[schema(value_type = String, example = "Tidak Terlambat")]
    pub late_status: LateStatus,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl AttendanceRecord {
    /// Google Maps link for the stored coordinates, if both are present.
    pub fn maps_url(&self) -> Option<String> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => Some(format!("https://www.google.com/maps?q={},{}", lat, lon)),
            _ => None,
        }
    }
}

impl<'r> FromRow<'r, MySqlRow> for AttendanceRecord {
    fn from_row(row: &'r MySqlRow) -> Result<Self, sqlx::Error> {
        let status: String = row.try_get("status")?;
        let late_status: String = row.try_get("late_status")?;

        Ok(Self {
            id: row.try_get("id")?,
            nim: row.try_get("nim")?,
            nama: row.try_get("nama")?,
            jurusan: row.try_get("jurusan")?,
            timestamp: row.try_get("timestamp")?,
            photo_path: row.try_get("photo_path")?,
            status: status.parse().map_err(|e| sqlx::Error::ColumnDecode {
                index: "status".into(),
                source: Box::new(e),
            })?,
            late_status: late_status.parse().map_err(|e| sqlx::Error::ColumnDecode {
                index: "late_status".into(),
                source: Box::new(e),
            })?,
            latitude: row.try_get("latitude")?,
            longitude: row.try_get("longitude")?,
        })
    }
}

/// Row of a student's own history view.
#[derive(Debug, Serialize, ToSchema)]
pub struct HistoryEntry {
    #[schema(example = "2026-03-02 07:55:10")]
    pub timestamp: String,
    #[schema(value_type = String, example = "Masuk")]
    pub status: AttendanceStatus,
    #[schema(value_type = String, example = "Tidak Terlambat")]
    pub late_status: LateStatus,
    #[schema(example = "https://www.google.com/maps?q=-6.2,106.816666")]
    pub maps_url: Option<String>,
}

impl From<&AttendanceRecord> for HistoryEntry {
    fn from(record: &AttendanceRecord) -> Self {
        Self {
            timestamp: time_format::format_timestamp(&record.timestamp),
            status: record.status,
            late_status: record.late_status,
            maps_url: record.maps_url(),
        }
    }
}

/// Row of the admin attendance table; `maps_url` is "N/A" without coordinates.
#[derive(Debug, Serialize, ToSchema)]
pub struct AdminAttendanceEntry {
    #[serde(flatten)]
    pub record: AttendanceRecord,
    #[schema(example = "N/A")]
    pub maps_url: String,
}

impl From<AttendanceRecord> for AdminAttendanceEntry {
    fn from(record: AttendanceRecord) -> Self {
        let maps_url = record.maps_url().unwrap_or_else(|| "N/A".to_string());
        Self { record, maps_url }
    }
}
