//! # HTTP Server Module
//!
//! Axum front end for the ingest service.
//!
//! # Endpoints
//!
//! - `GET /health` - Health check
//! - `GET /tables` - Registered table schemas
//! - `POST /upload/:table_name` - Validate and insert an uploaded file
//! - `POST /backup/:table_name` - Write an Avro backup of a table
//! - `POST /restore/:table_name` - Read back the newest backup

pub mod errors;
pub mod ingest_routes;
pub mod server;

pub use errors::{ApiError, ApiResult, ErrorResponse};
pub use server::HttpServer;
