//! Nearby - terminal restaurant finder library
//!
//! Exposes the application state, places client and UI so the binary and the
//! integration tests share one implementation.

pub mod app;
pub mod cli;
pub mod data;
pub mod details;
pub mod logging;
pub mod map;
pub mod table;
pub mod ui;
pub mod worker;
