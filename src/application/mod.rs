pub mod bootstrap;
pub mod history_store;
pub mod inference_pipeline;
pub mod prediction_service;
