//! Core library for Taskboard
//!
//! This crate contains the core state-management logic, including:
//! - Mock authentication and session handling
//! - Task management with derived statistics
//! - Local key-value persistence

pub mod auth;
pub mod error;
pub mod storage;
pub mod task;

mod id;

pub use error::Error;
pub type Result<T> = std::result::Result<T, Error>;
