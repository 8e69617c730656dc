pub mod attendance;
pub mod location;
pub mod page;
pub mod settings;
pub mod student;
