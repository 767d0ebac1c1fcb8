//! Vona Kernel Library
//!
//! This library exposes kernel internals for integration testing.
//! The main entry point for running the server is the `vona` binary.

pub mod config;
pub mod content;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod state;
pub mod store;
