pub mod aggregate;
pub mod config;
pub mod dashboard;
pub mod demo_season;
pub mod export;
pub mod records;
pub mod season;
pub mod season_db;
