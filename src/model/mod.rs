pub mod attendance;
pub mod jam_settings;
pub mod location;
pub mod role;
pub mod student;
