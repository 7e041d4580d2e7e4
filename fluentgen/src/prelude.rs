//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types and traits.
//!
//! ```ignore
//! use fluentgen::prelude::*;
//! ```

// Model types
pub use fluentgen_model::{
    ContractDef, DefaultValue, MethodDescriptor, ModelDocument, ModelError, ParameterDescriptor,
    ParseError, TypeDescriptorModel, TypeIdentifier, TypeRef, Visibility,
};

// Generation
pub use fluentgen_codegen::{
    Classification, Classifier, CodegenError, GeneratedSources, Generator, GeneratorConfig,
    OptionalPropertyMode, TypeMatcher, VerbExclusion, generate_from_file, generate_from_xml,
};
