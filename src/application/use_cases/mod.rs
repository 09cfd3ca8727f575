pub mod artifact_renderer;
pub mod catalog_generator;
pub mod code_pipeline;
