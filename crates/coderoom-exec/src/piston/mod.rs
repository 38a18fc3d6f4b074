//! Piston execution API client.
//!
//! Implements the `Executor` trait against the Piston v2 API
//! (`POST {base}/execute`, `GET {base}/runtimes`).

mod api;
mod client;
mod config;

pub use client::PistonClient;
pub use config::PistonConfig;
