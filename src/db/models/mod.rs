pub mod analytics;
pub mod system_settings;
pub mod trades;
pub mod users;
