//! SmartBookmarks: client-side sync and mutation engine for a personal bookmark manager.
//!
//! This library crate exposes all modules for use by the RPC binary and integration tests.

pub mod app;
pub mod database;
pub mod managers;
pub mod remote;
pub mod rpc_handler;
pub mod services;
pub mod types;
