//! HTTP request handlers for the linked-data API.

pub mod collections;
pub mod health;
pub mod items;
pub mod landing;
pub mod profiles;
