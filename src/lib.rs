//! # intake
//!
//! Request admission and status tracking.
//!
//! Each admitted request is written to a durable store, then published to a
//! queue for a downstream worker. Clients poll for status, newest first.
//! Postgres holds the records and pgmq carries the messages; in-memory
//! adapters stand in for both in tests and local runs.

pub mod adapter;
pub mod api;
pub mod client;
pub mod config;
pub mod db;
pub mod error;
pub mod model;
pub mod service;
pub mod telemetry;
