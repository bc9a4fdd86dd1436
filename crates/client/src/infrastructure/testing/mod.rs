//! Test doubles for code built on the client.

mod fixtures;

pub use fixtures::{RecordingAlerts, ScriptedTransport};
