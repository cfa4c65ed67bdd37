//! Course generation service.
//!
//! Generates course text through a pluggable LLM provider and keeps the results
//! in a process-local store exposed over a small JSON CRUD API.

pub mod config;
pub mod dtos;
pub mod handlers;
pub mod models;
pub mod services;
pub mod startup;

pub use startup::{AppState, Application};
