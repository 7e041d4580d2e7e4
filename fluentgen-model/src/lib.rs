//! # fluentgen Model
//!
//! Type descriptor model for fluent wrapper generation.
//!
//! This crate provides:
//! - Descriptor types for contracts, methods, parameters and type references
//! - The [`TypeDescriptorModel`] capability trait consumed by code generation
//! - An XML model document parser
//! - Model validation

pub mod error;
pub mod model;
pub mod parser;
pub mod types;
pub mod validation;

pub use error::{ModelError, ParseError};
pub use model::{ModelDocument, TypeDescriptorModel};
pub use parser::{parse_model, parse_model_file};
pub use types::{
    ContractDef, DefaultValue, MethodDescriptor, ParameterDescriptor, TypeIdentifier, TypeRef,
    Visibility,
};
pub use validation::{validate_contract, validate_model};
