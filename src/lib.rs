//! Item API behind `/lambda-integration`: a read handler and a write handler
//! over a single DynamoDB table keyed by `uuid`.

pub mod api_doc;
pub mod app;
pub mod config;
pub mod envelope;
pub mod error;
pub mod handlers;
pub mod ids;
pub mod models;
pub mod routes;
pub mod state;
pub mod store;
