use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::MySqlPool;
use tracing::debug;

use crate::gateway::{
    error::GatewayError,
    store::{RecordReader, RecordWriter},
};
use crate::model::{
    attendance::AttendanceRecord,
    jam_settings::{JamSettings, SettingsPolicy},
    student::{NewStudent, Student},
};

const RECORD_COLUMNS: &str = r#"
    id, nim, nama, jurusan, timestamp, photo_path,
    status, late_status, latitude, longitude
"#;

/// MySQL-backed store. Build one per credential: the read-only pool serves
/// `RecordReader`, the privileged pool serves `RecordWriter`.
#[derive(Clone)]
pub struct MySqlStore {
    pool: MySqlPool,
}

impl MySqlStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecordReader for MySqlStore {
    async fn find_student(
        &self,
        nim: &str,
        password: &str,
    ) -> Result<Option<Student>, GatewayError> {
        let student = sqlx::query_as::<_, Student>(
            r#"
            SELECT nim, nama, jurusan
            FROM mahasiswa
            WHERE nim = ? AND password = ?
            LIMIT 1
            "#,
        )
        .bind(nim)
        .bind(password)
        .fetch_optional(&self.pool)
        .await?;

        Ok(student)
    }

    async fn admin_matches(&self, username: &str, password: &str) -> Result<bool, GatewayError> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM admins WHERE username = ? AND password = ?",
        )
        .bind(username)
        .bind(password)
        .fetch_one(&self.pool)
        .await?;

        Ok(count > 0)
    }

    async fn list_records(&self) -> Result<Vec<AttendanceRecord>, GatewayError> {
        let sql = format!("SELECT {} FROM attendance ORDER BY timestamp DESC", RECORD_COLUMNS);
        let records = sqlx::query_as::<_, AttendanceRecord>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(records)
    }

    async fn list_records_for(
        &self,
        nim: &str,
        on: Option<NaiveDate>,
    ) -> Result<Vec<AttendanceRecord>, GatewayError> {
        let records = match on {
            Some(day) => {
                let sql = format!(
                    "SELECT {} FROM attendance WHERE nim = ? AND DATE(timestamp) = ? ORDER BY timestamp DESC",
                    RECORD_COLUMNS
                );
                sqlx::query_as::<_, AttendanceRecord>(&sql)
                    .bind(nim)
                    .bind(day)
                    .fetch_all(&self.pool)
                    .await?
            }
            None => {
                let sql = format!(
                    "SELECT {} FROM attendance WHERE nim = ? ORDER BY timestamp DESC",
                    RECORD_COLUMNS
                );
                sqlx::query_as::<_, AttendanceRecord>(&sql)
                    .bind(nim)
                    .fetch_all(&self.pool)
                    .await?
            }
        };

        debug!(nim, count = records.len(), "Fetched student records");
        Ok(records)
    }

    async fn photo_path_of(&self, id: &str) -> Result<Option<Option<String>>, GatewayError> {
        let path = sqlx::query_scalar::<_, Option<String>>(
            "SELECT photo_path FROM attendance WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(path)
    }

    async fn latest_settings(&self) -> Result<Option<JamSettings>, GatewayError> {
        let settings = sqlx::query_as::<_, JamSettings>(
            r#"
            SELECT jam_masuk, jam_pulang
            FROM jam_settings
            ORDER BY created_at DESC, id DESC
            LIMIT 1
            "#,
        )
        .fetch_optional(&self.pool)
        .await?;

        Ok(settings)
    }

    async fn list_students(&self) -> Result<Vec<Student>, GatewayError> {
        let students = sqlx::query_as::<_, Student>(
            "SELECT nim, nama, jurusan FROM mahasiswa ORDER BY nama",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(students)
    }
}

#[async_trait]
impl RecordWriter for MySqlStore {
    async fn insert_record(&self, record: &AttendanceRecord) -> Result<(), GatewayError> {
        sqlx::query(
            r#"
            INSERT INTO attendance
            (id, nim, nama, jurusan, timestamp, photo_path, status, late_status, latitude, longitude)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&record.id)
        .bind(&record.nim)
        .bind(&record.nama)
        .bind(&record.jurusan)
        .bind(record.timestamp)
        .bind(&record.photo_path)
        .bind(record.status.to_string())
        .bind(record.late_status.to_string())
        .bind(record.latitude)
        .bind(record.longitude)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete_record(&self, id: &str) -> Result<u64, GatewayError> {
        let result = sqlx::query("DELETE FROM attendance WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    async fn save_settings(
        &self,
        settings: &JamSettings,
        policy: SettingsPolicy,
    ) -> Result<(), GatewayError> {
        let mut tx = self.pool.begin().await?;

        if policy == SettingsPolicy::Replace {
            sqlx::query("DELETE FROM jam_settings")
                .execute(&mut *tx)
                .await?;
        }

        sqlx::query("INSERT INTO jam_settings (jam_masuk, jam_pulang) VALUES (?, ?)")
            .bind(settings.jam_masuk)
            .bind(settings.jam_pulang)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    async fn insert_student(&self, student: &NewStudent) -> Result<(), GatewayError> {
        sqlx::query("INSERT INTO mahasiswa (nim, nama, jurusan, password) VALUES (?, ?, ?, ?)")
            .bind(&student.nim)
            .bind(&student.nama)
            .bind(&student.jurusan)
            .bind(&student.password)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn delete_student(&self, nim: &str) -> Result<u64, GatewayError> {
        let result = sqlx::query("DELETE FROM mahasiswa WHERE nim = ?")
            .bind(nim)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
