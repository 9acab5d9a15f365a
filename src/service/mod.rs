//! Web service for VCF prioritization and narrative risk reports
//!
//! Accepts an annotated VCF upload, extracts the notable variants, fills the
//! prompt template and asks the narrative generator for a structured report.

pub mod config;
pub mod handlers;
pub mod server;
pub mod types;
pub mod validation;

pub use config::ServiceConfig;
pub use server::{create_app, AppState};
pub use types::*;
