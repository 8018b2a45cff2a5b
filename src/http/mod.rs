//! HTTP surface of the relay server

pub mod routes;

pub use routes::build_router;
