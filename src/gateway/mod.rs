//! Backend gateway: every remote database and storage call the service
//! makes goes through here, normalized to `Result<_, GatewayError>`.

pub mod bucket;
pub mod error;
#[cfg(test)]
pub mod memory;
pub mod mysql;
pub mod store;

use chrono::NaiveDate;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::model::{
    attendance::AttendanceRecord,
    jam_settings::{DEFAULT_JAM_SETTINGS, JamSettings, SettingsPolicy},
    student::{NewStudent, Student},
};
use error::GatewayError;
use store::{PhotoBucket, RecordReader, RecordWriter};

/// Message shown when a student is added with an existing NIM.
pub const DUPLICATE_NIM_MESSAGE: &str = "NIM sudah ada. Gunakan NIM yang berbeda.";

#[derive(Clone)]
pub struct Gateway {
    reader: Arc<dyn RecordReader>,
    writer: Arc<dyn RecordWriter>,
    photos: Arc<dyn PhotoBucket>,
    settings_policy: SettingsPolicy,
}

/// Object name of a stored photo: the last path segment of its public URL.
pub fn photo_name_from_url(url: &str) -> Option<&str> {
    url.rsplit('/').next().filter(|name| !name.is_empty())
}

impl Gateway {
    pub fn new(
        reader: Arc<dyn RecordReader>,
        writer: Arc<dyn RecordWriter>,
        photos: Arc<dyn PhotoBucket>,
        settings_policy: SettingsPolicy,
    ) -> Self {
        Self {
            reader,
            writer,
            photos,
            settings_policy,
        }
    }

    pub async fn validate_student(
        &self,
        nim: &str,
        password: &str,
    ) -> Result<Option<Student>, GatewayError> {
        self.reader.find_student(nim, password).await.map_err(|e| {
            error!(error = %e, nim, "Student validation failed");
            e
        })
    }

    pub async fn validate_admin(&self, username: &str, password: &str) -> Result<bool, GatewayError> {
        self.reader
            .admin_matches(username, password)
            .await
            .map_err(|e| {
                error!(error = %e, username, "Admin validation failed");
                e
            })
    }

    /// Uploads a photo and returns its public URL. A name that is already
    /// taken resolves to the existing object's URL without checking content.
    pub async fn upload_photo(&self, bytes: Vec<u8>, name: &str) -> Result<String, GatewayError> {
        match self.photos.upload(name, bytes).await {
            Ok(()) => Ok(self.photos.public_url(name)),
            Err(GatewayError::Duplicate(_)) => {
                warn!(name, "Photo already exists, reusing its URL");
                Ok(self.photos.public_url(name))
            }
            Err(e) => {
                error!(error = %e, name, "Photo upload failed");
                Err(e)
            }
        }
    }

    pub async fn insert_attendance(&self, record: &AttendanceRecord) -> Result<(), GatewayError> {
        self.writer.insert_record(record).await.map_err(|e| {
            error!(error = %e, id = %record.id, nim = %record.nim, "Failed to store attendance");
            e
        })
    }

    pub async fn fetch_all_records(&self) -> Result<Vec<AttendanceRecord>, GatewayError> {
        self.reader.list_records().await.map_err(|e| {
            error!(error = %e, "Failed to fetch attendance records");
            e
        })
    }

    pub async fn fetch_student_records(
        &self,
        nim: &str,
    ) -> Result<Vec<AttendanceRecord>, GatewayError> {
        self.reader.list_records_for(nim, None).await.map_err(|e| {
            error!(error = %e, nim, "Failed to fetch student records");
            e
        })
    }

    pub async fn fetch_student_records_on(
        &self,
        nim: &str,
        day: NaiveDate,
    ) -> Result<Vec<AttendanceRecord>, GatewayError> {
        self.reader
            .list_records_for(nim, Some(day))
            .await
            .map_err(|e| {
                error!(error = %e, nim, %day, "Failed to fetch today's records");
                e
            })
    }

    /// Deletes a record and its photo. Returns `false` when no such record
    /// exists. A failed photo removal is logged and does not stop the row
    /// from being deleted.
    pub async fn delete_record(&self, id: &str) -> Result<bool, GatewayError> {
        let photo_path = match self.reader.photo_path_of(id).await? {
            Some(path) => path,
            None => return Ok(false),
        };

        if let Some(name) = photo_path.as_deref().and_then(photo_name_from_url) {
            if let Err(e) = self.photos.remove(name).await {
                warn!(error = %e, id, name, "Photo removal failed, deleting record anyway");
            }
        }

        let deleted = self.writer.delete_record(id).await.map_err(|e| {
            error!(error = %e, id, "Failed to delete attendance record");
            e
        })?;

        info!(id, deleted, "Attendance record deleted");
        Ok(deleted > 0)
    }

    /// Latest cutoff times; falls back to 08:00:00 / 17:00:00 when the table
    /// is empty or cannot be read.
    pub async fn get_jam_settings(&self) -> JamSettings {
        match self.reader.latest_settings().await {
            Ok(Some(settings)) => settings,
            Ok(None) => *DEFAULT_JAM_SETTINGS,
            Err(e) => {
                error!(error = %e, "Failed to read jam settings, using defaults");
                *DEFAULT_JAM_SETTINGS
            }
        }
    }

    pub async fn update_jam_settings(&self, settings: &JamSettings) -> Result<(), GatewayError> {
        if settings.jam_pulang <= settings.jam_masuk {
            return Err(GatewayError::Validation(
                "Jam pulang harus setelah jam masuk.".to_string(),
            ));
        }

        self.writer
            .save_settings(settings, self.settings_policy)
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to save jam settings");
                e
            })
    }

    pub async fn list_students(&self) -> Result<Vec<Student>, GatewayError> {
        self.reader.list_students().await.map_err(|e| {
            error!(error = %e, "Failed to fetch students");
            e
        })
    }

    pub async fn add_student(&self, student: &NewStudent) -> Result<(), GatewayError> {
        match self.writer.insert_student(student).await {
            Ok(()) => {
                info!(nim = %student.nim, "Student added");
                Ok(())
            }
            Err(GatewayError::Duplicate(detail)) => {
                info!(nim = %student.nim, detail = %detail, "Duplicate NIM rejected");
                Err(GatewayError::Duplicate(DUPLICATE_NIM_MESSAGE.to_string()))
            }
            Err(e) => {
                error!(error = %e, nim = %student.nim, "Failed to add student");
                Err(e)
            }
        }
    }

    /// Returns `false` when no student has this NIM.
    pub async fn delete_student(&self, nim: &str) -> Result<bool, GatewayError> {
        let deleted = self.writer.delete_student(nim).await.map_err(|e| {
            error!(error = %e, nim, "Failed to delete student");
            e
        })?;
        Ok(deleted > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::memory::{MemoryBucket, MemoryStore};
    use crate::model::attendance::{AttendanceStatus, LateStatus};
    use crate::utils::time_window::parse_time;
    use chrono::NaiveDate;

    fn gateway_with(store: &MemoryStore, bucket: &MemoryBucket, policy: SettingsPolicy) -> Gateway {
        Gateway::new(
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            Arc::new(bucket.clone()),
            policy,
        )
    }

    fn record(id: &str, nim: &str, photo_path: Option<&str>) -> AttendanceRecord {
        AttendanceRecord {
            id: id.into(),
            nim: nim.into(),
            nama: "Budi".into(),
            jurusan: "TI".into(),
            timestamp: NaiveDate::from_ymd_opt(2026, 3, 2)
                .unwrap()
                .and_hms_opt(7, 55, 10)
                .unwrap(),
            photo_path: photo_path.map(str::to_string),
            status: AttendanceStatus::Masuk,
            late_status: LateStatus::TidakTerlambat,
            latitude: None,
            longitude: None,
        }
    }

    fn new_student(nim: &str, nama: &str) -> NewStudent {
        NewStudent {
            nim: nim.into(),
            nama: nama.into(),
            jurusan: "TI".into(),
            password: "pw".into(),
        }
    }

    #[actix_web::test]
    async fn duplicate_nim_is_rejected_and_existing_row_kept() {
        let store = MemoryStore::default();
        let gateway = gateway_with(&store, &MemoryBucket::default(), SettingsPolicy::Append);

        gateway.add_student(&new_student("2201001", "Budi")).await.unwrap();
        let err = gateway
            .add_student(&new_student("2201001", "Impostor"))
            .await
            .unwrap_err();

        assert!(matches!(&err, GatewayError::Duplicate(msg) if msg == DUPLICATE_NIM_MESSAGE));
        let students = gateway.list_students().await.unwrap();
        assert_eq!(students.len(), 1);
        assert_eq!(students[0].nama, "Budi");
        assert!(gateway.validate_student("2201001", "pw").await.unwrap().is_some());
    }

    #[actix_web::test]
    async fn deleting_a_record_removes_its_photo() {
        let store = MemoryStore::default();
        let bucket = MemoryBucket::default();
        let gateway = gateway_with(&store, &bucket, SettingsPolicy::Append);

        let url = gateway.upload_photo(vec![1, 2, 3], "2201001_20260302_075510.jpg").await.unwrap();
        gateway.insert_attendance(&record("r-1", "2201001", Some(&url))).await.unwrap();

        assert!(gateway.delete_record("r-1").await.unwrap());
        assert!(gateway.fetch_all_records().await.unwrap().is_empty());
        assert_eq!(bucket.removed(), vec!["2201001_20260302_075510.jpg".to_string()]);
        assert!(!bucket.contains("2201001_20260302_075510.jpg"));
    }

    #[actix_web::test]
    async fn deleting_a_record_without_photo_skips_storage() {
        let store = MemoryStore::default();
        let bucket = MemoryBucket::default();
        let gateway = gateway_with(&store, &bucket, SettingsPolicy::Append);

        gateway.insert_attendance(&record("r-1", "2201001", None)).await.unwrap();

        assert!(gateway.delete_record("r-1").await.unwrap());
        assert!(bucket.removed().is_empty());
    }

    #[actix_web::test]
    async fn photo_removal_failure_does_not_block_record_deletion() {
        let store = MemoryStore::default();
        let bucket = MemoryBucket::default();
        bucket.fail_removals();
        let gateway = gateway_with(&store, &bucket, SettingsPolicy::Append);

        gateway
            .insert_attendance(&record("r-1", "2201001", Some("https://s/photos/x.jpg")))
            .await
            .unwrap();

        assert!(gateway.delete_record("r-1").await.unwrap());
        assert!(gateway.fetch_all_records().await.unwrap().is_empty());
    }

    #[actix_web::test]
    async fn deleting_unknown_record_reports_absent() {
        let store = MemoryStore::default();
        let gateway = gateway_with(&store, &MemoryBucket::default(), SettingsPolicy::Append);
        assert!(!gateway.delete_record("missing").await.unwrap());
    }

    #[actix_web::test]
    async fn name_collision_returns_existing_url() {
        let bucket = MemoryBucket::default();
        let gateway = gateway_with(&MemoryStore::default(), &bucket, SettingsPolicy::Append);

        let first = gateway.upload_photo(vec![1], "a.jpg").await.unwrap();
        let second = gateway.upload_photo(vec![2], "a.jpg").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(bucket.object("a.jpg"), Some(vec![1]));
    }

    #[actix_web::test]
    async fn settings_fall_back_to_defaults_when_empty() {
        let gateway = gateway_with(
            &MemoryStore::default(),
            &MemoryBucket::default(),
            SettingsPolicy::Append,
        );
        let settings = gateway.get_jam_settings().await;
        assert_eq!(settings.jam_masuk, parse_time("08:00:00").unwrap());
        assert_eq!(settings.jam_pulang, parse_time("17:00:00").unwrap());
    }

    #[actix_web::test]
    async fn settings_fall_back_to_defaults_on_read_error() {
        let store = MemoryStore::default();
        store.fail_reads();
        let gateway = gateway_with(&store, &MemoryBucket::default(), SettingsPolicy::Append);
        assert_eq!(gateway.get_jam_settings().await, *DEFAULT_JAM_SETTINGS);
    }

    #[actix_web::test]
    async fn settings_policy_controls_history() {
        let later = JamSettings {
            jam_masuk: parse_time("07:30:00").unwrap(),
            jam_pulang: parse_time("16:00:00").unwrap(),
        };

        let store = MemoryStore::default();
        let gateway = gateway_with(&store, &MemoryBucket::default(), SettingsPolicy::Append);
        gateway.update_jam_settings(&DEFAULT_JAM_SETTINGS).await.unwrap();
        gateway.update_jam_settings(&later).await.unwrap();
        assert_eq!(store.settings_rows(), 2);
        assert_eq!(gateway.get_jam_settings().await, later);

        let store = MemoryStore::default();
        let gateway = gateway_with(&store, &MemoryBucket::default(), SettingsPolicy::Replace);
        gateway.update_jam_settings(&DEFAULT_JAM_SETTINGS).await.unwrap();
        gateway.update_jam_settings(&later).await.unwrap();
        assert_eq!(store.settings_rows(), 1);
        assert_eq!(gateway.get_jam_settings().await, later);
    }

    #[actix_web::test]
    async fn settings_require_pulang_after_masuk() {
        let store = MemoryStore::default();
        let gateway = gateway_with(&store, &MemoryBucket::default(), SettingsPolicy::Append);
        let inverted = JamSettings {
            jam_masuk: parse_time("17:00:00").unwrap(),
            jam_pulang: parse_time("08:00:00").unwrap(),
        };
        assert!(matches!(
            gateway.update_jam_settings(&inverted).await,
            Err(GatewayError::Validation(_))
        ));
        assert_eq!(store.settings_rows(), 0);
    }

    #[actix_web::test]
    async fn student_without_history_gets_empty_list() {
        let store = MemoryStore::default();
        let gateway = gateway_with(&store, &MemoryBucket::default(), SettingsPolicy::Append);
        gateway.insert_attendance(&record("r-1", "other", None)).await.unwrap();
        assert!(gateway.fetch_student_records("2201001").await.unwrap().is_empty());
    }

    #[test]
    fn photo_name_is_last_url_segment() {
        assert_eq!(
            photo_name_from_url("https://s/storage/v1/object/public/photos/a_1.jpg"),
            Some("a_1.jpg")
        );
        assert_eq!(photo_name_from_url("https://s/photos/"), None);
        assert_eq!(photo_name_from_url(""), None);
    }
}
