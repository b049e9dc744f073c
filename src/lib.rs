//! Wallet recovery service: an HTTP front-end for an external,
//! line-oriented recovery engine.
//!
//! The engine is a black box spawned per request. Its stdout is an
//! informal text protocol ([`protocol`]) that gets parsed into structured
//! results; [`engine`] owns the subprocess lifecycle and [`server`] maps
//! outcomes to HTTP responses.

pub mod consts;
pub mod engine;
pub mod protocol;
pub mod server;
