//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository and asset-store calls into use-case level APIs.
//! - Keep CLI and other transport layers decoupled from storage details.

pub mod catalog_service;
