//! Main generation entry point.

use crate::classify::Classifier;
use crate::config::{GeneratorConfig, OptionalPropertyMode};
use crate::csharp::{ExtensionGenerator, PropertyGenerator};
use crate::error::CodegenError;
use fluentgen_model::{MethodDescriptor, TypeDescriptorModel};

/// The two generated compilation units.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedSources {
    /// Partial class and interface property blocks.
    pub properties: String,
    /// Extension wrapper class.
    pub extensions: String,
}

/// Generator for fluent properties and extension wrappers.
pub struct Generator<'a> {
    config: &'a GeneratorConfig,
}

impl<'a> Generator<'a> {
    /// Creates a new generator.
    #[must_use]
    pub fn new(config: &'a GeneratorConfig) -> Self {
        Self { config }
    }

    /// Generates both files for `contract`.
    ///
    /// # Errors
    /// Returns `CodegenError::Model` if the model does not describe the
    /// contract.
    pub fn generate(
        &self,
        model: &dyn TypeDescriptorModel,
        contract: &str,
    ) -> Result<GeneratedSources, CodegenError> {
        let methods = model.methods(contract)?;
        tracing::debug!(contract, methods = methods.len(), "loaded contract");
        Ok(self.generate_methods(methods))
    }

    /// Generates both files from methods given in declaration order.
    #[must_use]
    pub fn generate_methods(&self, methods: &[MethodDescriptor]) -> GeneratedSources {
        if self.config.optional_property_mode == OptionalPropertyMode::Raw {
            tracing::warn!("raw optional properties are declared with the payload type but return the optional");
        }

        let classification = Classifier::new(self.config).classify(methods);
        tracing::debug!(
            receivers = classification.properties.len(),
            properties = classification.property_count(),
            extensions = classification.extensions.len(),
            "classified methods"
        );

        GeneratedSources {
            properties: PropertyGenerator::new(self.config).generate(&classification),
            extensions: ExtensionGenerator::new(self.config).generate(&classification),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fluentgen_model::{ContractDef, ModelError, ParameterDescriptor, TypeRef};

    fn contract() -> ContractDef {
        let mut contract = ContractDef::new("IoFluently", "IIoService");
        contract.add_method(
            MethodDescriptor::new("Exists")
                .param(ParameterDescriptor::new(
                    "path",
                    TypeRef::new("IoFluently", "AbsolutePath"),
                ))
                .returns(TypeRef::system("Boolean")),
        );
        contract.add_method(
            MethodDescriptor::new("DeleteFile").param(ParameterDescriptor::new(
                "path",
                TypeRef::new("IoFluently", "File"),
            )),
        );
        contract
    }

    #[test]
    fn test_generate_from_model() {
        let config = GeneratorConfig::default();
        let sources = Generator::new(&config)
            .generate(&contract(), "IIoService")
            .expect("generation");

        assert!(sources.properties.contains("public bool Exists => IoService.Exists(this);"));
        assert!(sources.extensions.contains("public static void DeleteFile(this File path) {"));
    }

    #[test]
    fn test_missing_contract_fails() {
        let config = GeneratorConfig::default();
        let err = Generator::new(&config)
            .generate(&contract(), "IFileSystem")
            .unwrap_err();

        assert!(matches!(
            err,
            CodegenError::Model(ModelError::ContractNotFound { .. })
        ));
        assert!(err.to_string().contains("IFileSystem"));
    }

    #[test]
    fn test_generation_is_deterministic() {
        let config = GeneratorConfig::default();
        let generator = Generator::new(&config);
        let first = generator.generate(&contract(), "IIoService").expect("first");
        let second = generator.generate(&contract(), "IIoService").expect("second");
        assert_eq!(first, second);
    }
}
