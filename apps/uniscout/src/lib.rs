//! # Uniscout Application Library
//!
//! The application side of Uniscout: HTTP API, CLI, configuration and the
//! network collaborators (upstream directory fetch, lead delivery,
//! notification polling). All directory semantics live in `uniscout-core`;
//! this crate only wires them to the outside world.

pub mod api;
pub mod cli;
pub mod config;
pub mod leads;
pub mod notify;
pub mod upstream;
