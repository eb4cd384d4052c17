//! # Quill Core
//!
//! The domain layer of the Quill blog service.
//! This crate contains the post lifecycle rules and the ports the
//! infrastructure has to implement. It has no database or HTTP dependencies.

pub mod domain;
pub mod error;
pub mod ports;
pub mod services;

pub use error::DomainError;
pub use services::PostService;
