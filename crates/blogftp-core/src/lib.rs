//! Core traits and types for blogftp authorizers.

pub mod auth;

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;
