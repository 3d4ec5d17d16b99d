//! Core library for the todo API
//!
//! This crate contains the core business logic, including:
//! - The task entity and its validation
//! - Cache and store ports with their backends
//! - The cache-aside task repository
//! - Task service orchestration

pub mod cache;
pub mod error;
pub mod service;
pub mod task;

pub use error::Error;
pub type Result<T> = std::result::Result<T, Error>;
