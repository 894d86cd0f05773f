// Observation features and validation
pub mod features;

// Classification and regression outcomes, history records
pub mod prediction;

// Planet size categories
pub mod planet;

// Port interfaces for the fitted models
pub mod ports;

// Repository traits
pub mod repositories;

// Domain-specific error types
pub mod errors;
