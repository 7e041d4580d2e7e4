//! Extension wrapper generation.

use super::{INDENT, TypeRenderer, close_namespace, open_namespace, preamble};
use crate::classify::{Classification, Classifier};
use crate::config::GeneratorConfig;
use fluentgen_model::types::{MethodDescriptor, TypeRef};

/// Generator for the extension wrappers file.
pub struct ExtensionGenerator<'a> {
    config: &'a GeneratorConfig,
    classifier: Classifier<'a>,
    renderer: TypeRenderer,
}

impl<'a> ExtensionGenerator<'a> {
    /// Creates a new extension generator.
    #[must_use]
    pub fn new(config: &'a GeneratorConfig) -> Self {
        Self {
            config,
            classifier: Classifier::new(config),
            renderer: TypeRenderer::new(config.qualify_type_names),
        }
    }

    /// Generates the complete extensions file.
    #[must_use]
    pub fn generate(&self, classification: &Classification<'_>) -> String {
        let mut output = preamble(&self.config.preamble);
        let outer = open_namespace(&mut output, &self.config.extensions_namespace);

        if !self.config.extensions_summary.is_empty() {
            output.push_str(&format!("{outer}/// <summary>\n"));
            for line in &self.config.extensions_summary {
                output.push_str(&format!("{outer}/// {line}\n"));
            }
            output.push_str(&format!("{outer}/// </summary>\n"));
        }
        output.push_str(&format!(
            "{outer}public static partial class {}\n",
            self.config.extensions_class
        ));
        output.push_str(&format!("{outer}{{\n"));

        let indent = format!("{outer}{INDENT}");
        let mut functions = Vec::new();
        for method in &classification.extensions {
            functions.push(self.generate_wrapper(&indent, method));
            if let Some((name, payload)) = self.classifier.try_unwrap(method) {
                functions.push(self.generate_unwrapped(&indent, method, name, payload));
            }
        }
        output.push_str(&functions.join("\n"));

        output.push_str(&format!("{outer}}}\n"));
        close_namespace(&mut output, &self.config.extensions_namespace);
        output
    }

    /// Generates the wrapper forwarding to the service method.
    fn generate_wrapper(&self, indent: &str, method: &MethodDescriptor) -> String {
        let call = self.forwarding_call(method);
        let statement = if method.return_type.is_void() {
            format!("{call};")
        } else {
            format!("return {call};")
        };

        self.function(
            indent,
            &method.return_type,
            &method.name,
            method,
            &statement,
        )
    }

    /// Generates the variant that extracts the optional's payload.
    fn generate_unwrapped(
        &self,
        indent: &str,
        method: &MethodDescriptor,
        name: &str,
        payload: &TypeRef,
    ) -> String {
        let statement = format!(
            "return {}.{};",
            self.forwarding_call(method),
            self.config.payload_accessor
        );
        self.function(indent, payload, name, method, &statement)
    }

    fn function(
        &self,
        indent: &str,
        return_type: &TypeRef,
        name: &str,
        method: &MethodDescriptor,
        statement: &str,
    ) -> String {
        let mut output = String::new();
        output.push_str(&format!(
            "{indent}public static {} {name}({}) {{\n",
            self.renderer.render(return_type),
            self.parameter_list(method)
        ));
        output.push_str(&format!("{indent}{INDENT}{statement}\n"));
        output.push_str(&format!("{indent}}}\n"));
        output
    }

    /// Renders the declared parameter list; the first parameter is the
    /// receiver.
    fn parameter_list(&self, method: &MethodDescriptor) -> String {
        method
            .parameters
            .iter()
            .enumerate()
            .map(|(i, parameter)| {
                let modifier = if i == 0 {
                    "this "
                } else if parameter.is_output {
                    "out "
                } else {
                    ""
                };
                let mut declared = format!(
                    "{modifier}{} {}",
                    self.renderer.render(&parameter.ty),
                    parameter.name
                );
                if let Some(default) = &parameter.default {
                    declared.push_str(" = ");
                    declared.push_str(&self.renderer.render_default(default));
                }
                declared
            })
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Renders `receiver.Service.Method(args)`.
    fn forwarding_call(&self, method: &MethodDescriptor) -> String {
        let arguments: Vec<String> = method
            .parameters
            .iter()
            .map(|p| {
                if p.is_output {
                    format!("out {}", p.name)
                } else {
                    p.name.clone()
                }
            })
            .collect();
        let receiver = method
            .first_parameter()
            .map_or("this", |p| p.name.as_str());

        format!(
            "{receiver}.{}.{}({})",
            self.config.service_accessor,
            method.name,
            arguments.join(", ")
        )
    }
}
