// Domain layer - royalty view models and pure chart reshaping
pub mod dashboard;
pub mod period;
pub mod royalty;
pub mod series;
