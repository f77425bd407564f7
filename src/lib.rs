pub mod cli;
pub mod clients;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod models;
pub mod pacing;
pub mod report;
pub mod sheet;
