pub mod auth;
pub mod configuration;
pub mod error;
pub mod handlers;
pub mod models;
pub mod permission;
pub mod policy;
pub mod related;
pub mod repository;
pub mod startup;
pub mod telemetry;
