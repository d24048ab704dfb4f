pub mod config;
pub mod optimize;
pub mod providers;
