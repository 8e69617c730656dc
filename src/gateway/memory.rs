//! In-memory capabilities for tests. `MemoryStore` enforces NIM uniqueness
//! like the real table; `MemoryBucket` records every storage call.

use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::gateway::{
    error::GatewayError,
    store::{PhotoBucket, RecordReader, RecordWriter},
};
use crate::model::{
    attendance::AttendanceRecord,
    jam_settings::{JamSettings, SettingsPolicy},
    student::{NewStudent, Student},
};

#[derive(Default)]
struct StoreState {
    students: Vec<NewStudent>,
    admins: Vec<(String, String)>,
    records: Vec<AttendanceRecord>,
    settings: Vec<JamSettings>,
    fail_reads: bool,
    fail_record_inserts: bool,
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<StoreState>>,
}

impl MemoryStore {
    fn lock(&self) -> std::sync::MutexGuard<'_, StoreState> {
        self.state.lock().expect("memory store poisoned")
    }

    pub fn add_admin(&self, username: &str, password: &str) {
        self.lock()
            .admins
            .push((username.to_string(), password.to_string()));
    }

    pub fn fail_reads(&self) {
        self.lock().fail_reads = true;
    }

    pub fn fail_record_inserts(&self) {
        self.lock().fail_record_inserts = true;
    }

    pub fn records(&self) -> Vec<AttendanceRecord> {
        self.lock().records.clone()
    }

    pub fn settings_rows(&self) -> usize {
        self.lock().settings.len()
    }

    fn check_reads(state: &StoreState) -> Result<(), GatewayError> {
        if state.fail_reads {
            return Err(GatewayError::Transport("connection refused".to_string()));
        }
        Ok(())
    }
}

fn profile_of(student: &NewStudent) -> Student {
    Student {
        nim: student.nim.clone(),
        nama: student.nama.clone(),
        jurusan: student.jurusan.clone(),
    }
}

fn newest_first(mut records: Vec<AttendanceRecord>) -> Vec<AttendanceRecord> {
    records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    records
}

#[async_trait]
impl RecordReader for MemoryStore {
    async fn find_student(
        &self,
        nim: &str,
        password: &str,
    ) -> Result<Option<Student>, GatewayError> {
        let state = self.lock();
        Self::check_reads(&state)?;
        Ok(state
            .students
            .iter()
            .find(|s| s.nim == nim && s.password == password)
            .map(profile_of))
    }

    async fn admin_matches(&self, username: &str, password: &str) -> Result<bool, GatewayError> {
        let state = self.lock();
        Self::check_reads(&state)?;
        Ok(state
            .admins
            .iter()
            .any(|(u, p)| u == username && p == password))
    }

    async fn list_records(&self) -> Result<Vec<AttendanceRecord>, GatewayError> {
        let state = self.lock();
        Self::check_reads(&state)?;
        Ok(newest_first(state.records.clone()))
    }

    async fn list_records_for(
        &self,
        nim: &str,
        on: Option<NaiveDate>,
    ) -> Result<Vec<AttendanceRecord>, GatewayError> {
        let state = self.lock();
        Self::check_reads(&state)?;
        let records = state
            .records
            .iter()
            .filter(|r| r.nim == nim)
            .filter(|r| on.is_none_or(|day| r.timestamp.date() == day))
            .cloned()
            .collect();
        Ok(newest_first(records))
    }

    async fn photo_path_of(&self, id: &str) -> Result<Option<Option<String>>, GatewayError> {
        let state = self.lock();
        Self::check_reads(&state)?;
        Ok(state
            .records
            .iter()
            .find(|r| r.id == id)
            .map(|r| r.photo_path.clone()))
    }

    async fn latest_settings(&self) -> Result<Option<JamSettings>, GatewayError> {
        let state = self.lock();
        Self::check_reads(&state)?;
        Ok(state.settings.last().copied())
    }

    async fn list_students(&self) -> Result<Vec<Student>, GatewayError> {
        let state = self.lock();
        Self::check_reads(&state)?;
        let mut students: Vec<Student> = state.students.iter().map(profile_of).collect();
        students.sort_by(|a, b| a.nama.cmp(&b.nama));
        Ok(students)
    }
}

#[async_trait]
impl RecordWriter for MemoryStore {
    async fn insert_record(&self, record: &AttendanceRecord) -> Result<(), GatewayError> {
        let mut state = self.lock();
        if state.fail_record_inserts {
            return Err(GatewayError::Transport("insert rejected".to_string()));
        }
        state.records.push(record.clone());
        Ok(())
    }

    async fn delete_record(&self, id: &str) -> Result<u64, GatewayError> {
        let mut state = self.lock();
        let before = state.records.len();
        state.records.retain(|r| r.id != id);
        Ok((before - state.records.len()) as u64)
    }

    async fn save_settings(
        &self,
        settings: &JamSettings,
        policy: SettingsPolicy,
    ) -> Result<(), GatewayError> {
        let mut state = self.lock();
        if policy == SettingsPolicy::Replace {
            state.settings.clear();
        }
        state.settings.push(*settings);
        Ok(())
    }

    async fn insert_student(&self, student: &NewStudent) -> Result<(), GatewayError> {
        let mut state = self.lock();
        if state.students.iter().any(|s| s.nim == student.nim) {
            return Err(GatewayError::Duplicate(format!(
                "Duplicate entry '{}' for key 'PRIMARY'",
                student.nim
            )));
        }
        state.students.push(student.clone());
        Ok(())
    }

    async fn delete_student(&self, nim: &str) -> Result<u64, GatewayError> {
        let mut state = self.lock();
        let before = state.students.len();
        state.students.retain(|s| s.nim != nim);
        Ok((before - state.students.len()) as u64)
    }
}

#[derive(Default)]
struct BucketState {
    objects: HashMap<String, Vec<u8>>,
    uploads: usize,
    removed: Vec<String>,
    fail_uploads: bool,
    fail_removals: bool,
}

#[derive(Clone, Default)]
pub struct MemoryBucket {
    state: Arc<Mutex<BucketState>>,
}

impl MemoryBucket {
    fn lock(&self) -> std::sync::MutexGuard<'_, BucketState> {
        self.state.lock().expect("memory bucket poisoned")
    }

    pub fn fail_uploads(&self) {
        self.lock().fail_uploads = true;
    }

    pub fn fail_removals(&self) {
        self.lock().fail_removals = true;
    }

    pub fn uploads(&self) -> usize {
        self.lock().uploads
    }

    pub fn removed(&self) -> Vec<String> {
        self.lock().removed.clone()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.lock().objects.contains_key(name)
    }

    pub fn object(&self, name: &str) -> Option<Vec<u8>> {
        self.lock().objects.get(name).cloned()
    }
}

#[async_trait]
impl PhotoBucket for MemoryBucket {
    async fn upload(&self, name: &str, bytes: Vec<u8>) -> Result<(), GatewayError> {
        let mut state = self.lock();
        state.uploads += 1;
        if state.fail_uploads {
            return Err(GatewayError::Transport("storage unavailable".to_string()));
        }
        if state.objects.contains_key(name) {
            return Err(GatewayError::Duplicate(format!("object {name} already exists")));
        }
        state.objects.insert(name.to_string(), bytes);
        Ok(())
    }

    async fn remove(&self, name: &str) -> Result<(), GatewayError> {
        let mut state = self.lock();
        state.removed.push(name.to_string());
        if state.fail_removals {
            return Err(GatewayError::Transport("storage unavailable".to_string()));
        }
        state.objects.remove(name);
        Ok(())
    }

    fn public_url(&self, name: &str) -> String {
        format!("https://storage.test/storage/v1/object/public/photos/{name}")
    }
}
