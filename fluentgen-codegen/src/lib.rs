//! # fluentgen Codegen
//!
//! Generates fluent receiver properties and extension wrappers from a
//! service contract description.
//!
//! This crate provides:
//! - Method classification into properties and extension wrappers
//! - Type name and default value rendering
//! - Properties and extension file emission
//! - Atomic output writing and staleness checks

pub mod classify;
pub mod config;
pub mod csharp;
pub mod error;
pub mod generator;
pub mod output;

pub use classify::{Classification, Classifier};
pub use config::{GeneratorConfig, OptionalPropertyMode, TypeMatcher, VerbExclusion};
pub use error::CodegenError;
pub use generator::{GeneratedSources, Generator};

/// Generates both files from an XML model document string.
///
/// # Arguments
/// * `xml` - XML model content
/// * `contract` - Bare or qualified name of the service contract
/// * `config` - Generator configuration
///
/// # Errors
/// Returns `CodegenError` if parsing, validation or contract lookup fails.
pub fn generate_from_xml(
    xml: &str,
    contract: &str,
    config: &GeneratorConfig,
) -> Result<GeneratedSources, CodegenError> {
    let model = fluentgen_model::parse_model(xml)?;
    fluentgen_model::validate_model(&model)?;
    Generator::new(config).generate(&model, contract)
}

/// Generates both files from an XML model document file.
///
/// # Errors
/// Returns `CodegenError` if reading, parsing, validation or contract lookup
/// fails.
pub fn generate_from_file(
    path: &std::path::Path,
    contract: &str,
    config: &GeneratorConfig,
) -> Result<GeneratedSources, CodegenError> {
    let xml = std::fs::read_to_string(path)?;
    generate_from_xml(&xml, contract, config)
}
