pub mod app;
pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;

pub use crate::app::{bootstrap, init_tracing};
pub use crate::application::{CatalogGenerator, ColumnSource, GenerationInputs, MappingSource};
pub use crate::domain::error::{AppError, Result};
pub use crate::domain::{
    ArtifactKind, Code, GenerationOutcome, HeaderMode, Mapping, MappingOutcome, OutputArtifact,
    RunDate, Status, Table, UploadedFile, Workflow,
};
pub use crate::infrastructure::config::GeneratorConfig;
pub use crate::infrastructure::tabular::TabularReader;
pub use crate::interfaces::form::GeneratorForm;
