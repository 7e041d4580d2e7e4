//! # fluentgen
//!
//! Generates fluent, receiver-first shorthands for a service contract.
//!
//! Given a description of a service interface, fluentgen emits two source
//! files: partial types with expression-bodied properties for side-effect
//! free single-argument methods, and a static class of extension wrappers
//! that forward every other receiver-first method to the service.
//!
//! ## Quick Start
//!
//! ```ignore
//! use fluentgen::prelude::*;
//!
//! let model = fluentgen::model::parse_model_file("model.xml".as_ref())?;
//! let config = GeneratorConfig::default();
//! let sources = Generator::new(&config).generate(&model, "IIoService")?;
//! sources.write_to("src/IoFluently".as_ref(), &config)?;
//! ```
//!
//! ## Crate Organization
//!
//! - [`model`] - Descriptor types, model documents and validation
//! - [`codegen`] - Classification, rendering and file emission

pub mod prelude;

/// Type descriptor model.
pub mod model {
    pub use fluentgen_model::*;
}

/// Property and extension wrapper generation.
pub mod codegen {
    pub use fluentgen_codegen::*;
}

// Re-export commonly used items at the crate root
pub use fluentgen_codegen::{
    CodegenError, GeneratedSources, Generator, GeneratorConfig, generate_from_file,
    generate_from_xml,
};
pub use fluentgen_model::{ModelDocument, TypeDescriptorModel};
