use chrono::NaiveTime;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use strum_macros::EnumString;
use utoipa::ToSchema;

use crate::utils::time_format;

/// Fallback used while the `jam_settings` table is empty or unreadable.
pub static DEFAULT_JAM_SETTINGS: Lazy<JamSettings> = Lazy::new(|| JamSettings {
    jam_masuk: NaiveTime::from_hms_opt(8, 0, 0).unwrap_or_default(),
    jam_pulang: NaiveTime::from_hms_opt(17, 0, 0).unwrap_or_default(),
});

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct JamSettings {
    #[serde(with = "time_format::time_of_day")]
    #[schema(value_type = String, example = "08:00:00")]
    pub jam_masuk: NaiveTime,
    #[serde(with = "time_format::time_of_day")]
    #[schema(value_type = String, example = "17:00:00")]
    pub jam_pulang: NaiveTime,
}

/// Payload of `PUT /api/admin/settings`; strings are validated as HH:MM:SS.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateJamSettings {
    #[schema(example = "07:30:00")]
    pub jam_masuk: String,
    #[schema(example = "16:00:00")]
    pub jam_pulang: String,
}

/// What happens to older rows when new cutoff times are saved.
#[derive(Debug, Copy, Clone, PartialEq, Eq, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum SettingsPolicy {
    /// keep every row, newest wins
    Append,
    /// delete all rows first, leaving exactly one
    Replace,
}
