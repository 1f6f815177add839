//! `Taskboard` server library.
//!
//! Exposes the HTTP router, configuration and server bootstrap for use in
//! tests and embedding. The server is a thin JSON layer over
//! [`taskboard::Board`]; all ordering rules live in the engine.

pub mod api;
pub mod config;
pub mod server;
