//! Transports to upstream agents.

pub mod http_a2a_service;

pub use http_a2a_service::HttpA2aService;
