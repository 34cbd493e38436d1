//! ChatKing browse core: tabs, navigation history, search dispatch and
//! address resolution for the ChatKing search page.
//!
//! This library crate exposes all modules for use by the RPC binary and integration tests.

pub mod app;
pub mod logging;
pub mod managers;
pub mod platform;
pub mod rpc_handler;
pub mod services;
pub mod types;
