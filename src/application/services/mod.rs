//! Application services

pub mod generator;

pub use generator::{ArtifactPaths, GenerateReport, GeneratorService, ModelSummary};
