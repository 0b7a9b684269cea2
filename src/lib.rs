//! Recipebook - A multilingual recipe-sharing service
//!
//! This library provides the core functionality for Recipebook: paginated
//! recipe listings and per-language translation completeness.

pub mod api;
pub mod config;
pub mod db;
pub mod models;
pub mod services;
