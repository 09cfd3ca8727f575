pub mod artifact;
pub mod code;
pub mod error;
pub mod mapping;
pub mod request;
pub mod table;

pub use artifact::{ArtifactKind, ContentKind, GenerationOutcome, OutputArtifact};
pub use code::{sanitize, Code};
pub use mapping::{Mapping, MappingOutcome};
pub use request::{Account, GenerationRequest, RunDate, Status, UploadedFile, Workflow};
pub use table::{HeaderMode, Table};
