//! `FireKyt` CLI Library
//!
//! Command-line access to publishing connections, scheduling, immediate
//! publishing and publication history.

pub mod auth_cmd;
pub mod config;
pub mod connections_cmd;
pub mod content_cmd;
pub mod context;
pub mod fmt;
pub mod history_cmd;
pub mod publish_cmd;
pub mod schedule_cmd;
