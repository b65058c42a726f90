//! Capture listener: accepts every inbound hook, snapshots it, and answers
//! with the configured mock response or an empty 200.

mod handler;
mod server;

pub use server::CaptureServer;
