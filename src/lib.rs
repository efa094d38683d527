//! Event tracker: events, their tasks, and guest lists in a local SQLite file.
//!
//! [`db::EventDatabase`] is the gateway to storage; everything else either
//! describes the records it returns or presents them.

pub mod commands;
pub mod config;
pub mod db;
pub mod models;
pub mod password;
