//! # Quill Shared
//!
//! Wire types of the HTTP API, shared by the server and its clients.
//! Kept free of domain types so a front end can compile it on its own.

pub mod dto;
pub mod response;

pub use response::{ApiResponse, ErrorResponse};
