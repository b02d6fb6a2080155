// Infrastructure layer - External dependencies and adapters
pub mod backend_repository;
pub mod config;
pub mod error;
pub mod http_response;
