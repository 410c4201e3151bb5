//! Mock task API library
//!
//! This module exports the server components for the binary and for tests.

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod fault;
pub mod logging;
pub mod pagination;
pub mod seed;
pub mod store;
pub mod types;
