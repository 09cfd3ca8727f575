pub mod use_cases;

pub use use_cases::catalog_generator::{
    CatalogGenerator, ColumnSource, GenerationInputs, MappingSource,
};
