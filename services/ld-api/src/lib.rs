//! Linked-Data API Service Library
//!
//! This crate provides the HTTP server for geological features, provinces
//! and stratigraphic units, each served in several alternate profiles and
//! media types chosen by content negotiation by profile.

pub mod config;
pub mod content_negotiation;
pub mod entity;
pub mod handlers;
pub mod routes;
pub mod serializers;
pub mod state;
