pub mod context;
pub mod dto;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod headers;
pub mod openapi;
pub mod routes;

pub use context::RestContext;
