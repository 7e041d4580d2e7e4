//! Receiver property generation.
//!
//! Each receiver type gets one partial block whose members forward to the
//! service reachable from the receiver instance.

use super::{INDENT, TypeRenderer, close_namespace, open_namespace, preamble};
use crate::classify::{Classification, Classifier};
use crate::config::{GeneratorConfig, OptionalPropertyMode};
use fluentgen_model::types::{MethodDescriptor, TypeIdentifier};

/// Generator for the properties file.
pub struct PropertyGenerator<'a> {
    config: &'a GeneratorConfig,
    classifier: Classifier<'a>,
    renderer: TypeRenderer,
}

impl<'a> PropertyGenerator<'a> {
    /// Creates a new property generator.
    #[must_use]
    pub fn new(config: &'a GeneratorConfig) -> Self {
        Self {
            config,
            classifier: Classifier::new(config),
            renderer: TypeRenderer::new(config.qualify_type_names),
        }
    }

    /// Generates the complete properties file.
    #[must_use]
    pub fn generate(&self, classification: &Classification<'_>) -> String {
        let mut output = preamble(&self.config.preamble);

        for (receiver, methods) in &classification.properties {
            output.push_str(&self.generate_block(receiver, methods));
        }

        output
    }

    /// Generates the partial block for one receiver.
    fn generate_block(&self, receiver: &TypeIdentifier, methods: &[&MethodDescriptor]) -> String {
        let mut output = String::new();
        let outer = open_namespace(&mut output, &receiver.namespace);
        let name = receiver.bare_name();

        let kind = if name == self.config.capability_receiver {
            "interface"
        } else {
            "class"
        };
        output.push_str(&format!("{outer}public partial {kind} {name}\n"));
        output.push_str(&format!("{outer}{{\n"));

        for method in methods {
            output.push_str(&format!(
                "{outer}{INDENT}{}\n",
                self.generate_property(method)
            ));
        }

        output.push_str(&format!("{outer}}}\n"));
        close_namespace(&mut output, &receiver.namespace);
        output
    }

    /// Generates a single expression-bodied property.
    fn generate_property(&self, method: &MethodDescriptor) -> String {
        let (name, ty, unwrapped) = self.classifier.property_shape(method);
        let call = format!("{}.{}(this)", self.config.service_accessor, method.name);

        let body = match self.config.optional_property_mode {
            OptionalPropertyMode::Unwrap if unwrapped => {
                format!("{call}.{}", self.config.payload_accessor)
            }
            _ => call,
        };

        format!("public {} {name} => {body};", self.renderer.render(ty))
    }
}
