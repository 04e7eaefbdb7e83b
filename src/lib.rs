//! Credit Bureau Report Ingestion API Library
//!
//! This library ingests credit-bureau XML exports, extracts a normalized
//! credit report from the loosely-structured document, persists it, and
//! serves the stored collection over HTTP.
//!
//! # Modules
//!
//! - `config`: Configuration management.
//! - `db`: Database connection and pool management.
//! - `db_storage`: Database storage operations.
//! - `errors`: Error handling types.
//! - `extractor`: The extraction/normalization transform.
//! - `handlers`: HTTP request handlers.
//! - `models`: Core data models.
//! - `source`: Absent-safe access to the parsed source document.
//! - `xml`: XML to generic tree conversion.

pub mod config;
pub mod db;
pub mod db_storage;
pub mod errors;
pub mod extractor;
pub mod handlers;
pub mod models;
pub mod source;
pub mod xml;
