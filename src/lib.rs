//! Image-sharing HTTP API: sign up, log in, upload image metadata (title and
//! URL), list, fetch and delete images. Protected routes use HTTP Basic
//! authentication checked on every request.

pub mod app;
pub mod auth;
pub mod config;
pub mod db;
pub mod docs;
pub mod error;
pub mod images;
pub mod state;
pub mod store;
pub mod validation;
