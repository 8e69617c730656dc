pub mod location_cache;
pub mod time_format;
pub mod time_window;
pub mod token_revocation;
