//! # Guild Board
//!
//! Match tracker, leaderboards and rival statistics for a gaming guild.
//!
//! ## Architecture
//!
//! - **models**: Match records, player stat lines and derived statistics
//! - **storage**: The match record store (JSONL file or in-memory)
//! - **api**: REST API over the store, admin login and the Twitch proxy
//! - **client**: HTTP client for the API and the session snapshot
//! - **calculate**: Folding matches into guild and player statistics
//! - **query**: Filtering, sorting and pagination of views
//! - **streams**: Twitch Helix client
//! - **maintenance**: Backups, name consolidation and file validation
//! - **config**: Configuration loading and validation

pub mod api;
pub mod calculate;
pub mod client;
pub mod config;
pub mod maintenance;
pub mod models;
pub mod query;
pub mod storage;
pub mod streams;

pub use models::*;
