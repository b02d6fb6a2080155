// Application layer - use cases over the royalty repository
pub mod chart_service;
pub mod dashboard_service;
#[cfg(test)]
pub mod mock_repository;
pub mod response_cache;
pub mod royalty_repository;
