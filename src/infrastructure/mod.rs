pub mod ml;
pub mod persistence;
pub mod repositories;

pub use repositories::InMemoryPredictionHistoryRepository;
