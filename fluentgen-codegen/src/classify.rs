//! Method classification.
//!
//! Decides which contract methods become receiver properties, which become
//! extension wrappers, and groups the properties by receiver type.

use crate::config::GeneratorConfig;
use fluentgen_model::types::{MethodDescriptor, TypeIdentifier, TypeRef, Visibility};
use std::collections::BTreeMap;

/// Result of classifying a contract's methods.
#[derive(Debug, Clone, Default)]
pub struct Classification<'m> {
    /// Property methods per receiver, ordered by name, then parameter count,
    /// then declaration order.
    pub properties: BTreeMap<TypeIdentifier, Vec<&'m MethodDescriptor>>,
    /// Extension wrapper methods in declaration order.
    pub extensions: Vec<&'m MethodDescriptor>,
}

impl Classification<'_> {
    /// Returns the number of property methods across all receivers.
    #[must_use]
    pub fn property_count(&self) -> usize {
        self.properties.values().map(Vec::len).sum()
    }
}

/// Applies a [`GeneratorConfig`]'s eligibility rules to methods.
#[derive(Debug, Clone, Copy)]
pub struct Classifier<'c> {
    config: &'c GeneratorConfig,
}

impl<'c> Classifier<'c> {
    /// Creates a classifier for the given configuration.
    #[must_use]
    pub const fn new(config: &'c GeneratorConfig) -> Self {
        Self { config }
    }

    /// Classifies `methods`, given in declaration order.
    #[must_use]
    pub fn classify<'m>(&self, methods: &'m [MethodDescriptor]) -> Classification<'m> {
        let mut candidates: Vec<&MethodDescriptor> = Vec::new();
        let mut extensions = Vec::new();

        for method in methods {
            if self.is_property(method) {
                tracing::trace!(method = %method.name, "property");
                candidates.push(method);
            } else if self.is_extension(method) {
                tracing::trace!(method = %method.name, "extension");
                extensions.push(method);
            } else {
                tracing::trace!(method = %method.name, "skipped");
            }
        }

        // stable: equal keys keep declaration order
        candidates.sort_by(|a, b| {
            a.name
                .cmp(&b.name)
                .then(a.parameters.len().cmp(&b.parameters.len()))
        });

        let mut properties: BTreeMap<TypeIdentifier, Vec<&MethodDescriptor>> = BTreeMap::new();
        for method in candidates {
            if let Some(receiver) = method.first_parameter() {
                properties
                    .entry(receiver.ty.identifier())
                    .or_default()
                    .push(method);
            }
        }

        Classification {
            properties,
            extensions,
        }
    }

    /// Returns true if `method` becomes a property on its only parameter's
    /// type.
    #[must_use]
    pub fn is_property(&self, method: &MethodDescriptor) -> bool {
        let [receiver] = method.parameters.as_slice() else {
            return false;
        };

        if method.is_static && method.return_type.is_void() {
            return false;
        }

        if method.visibility != Visibility::Public {
            return false;
        }

        if receiver.ty.is_array()
            || !self
                .config
                .property_receivers
                .iter()
                .any(|m| m.matches_type(&receiver.ty))
        {
            return false;
        }

        !self.is_excluded_name(&method.name)
    }

    /// Returns true if `method` becomes an extension wrapper on its first
    /// parameter's type.
    #[must_use]
    pub fn is_extension(&self, method: &MethodDescriptor) -> bool {
        if self.is_property(method) {
            return false;
        }

        let Some(receiver) = method.first_parameter() else {
            return false;
        };

        if receiver.is_output || receiver.ty.is_generic() || receiver.ty.is_array() {
            return false;
        }

        self.config
            .extension_hosts
            .iter()
            .any(|m| m.matches_type(&receiver.ty))
    }

    /// Returns true if the name marks an action rather than an accessor.
    #[must_use]
    pub fn is_excluded_name(&self, name: &str) -> bool {
        self.config.excluded_markers.iter().any(|r| r.excludes(name))
            || self.config.excluded_names.iter().any(|n| n == name)
    }

    /// Returns the payload type if `ty` is the optional type with exactly one
    /// argument.
    #[must_use]
    pub fn optional_payload<'t>(&self, ty: &'t TypeRef) -> Option<&'t TypeRef> {
        match ty.arguments.as_slice() {
            [payload] if ty.bare_name() == self.config.optional_binder && !ty.is_array() => {
                Some(payload)
            }
            _ => None,
        }
    }

    /// For a `Try...` method returning the optional type, returns the name
    /// without `Try` and the payload type.
    #[must_use]
    pub fn try_unwrap<'m>(&self, method: &'m MethodDescriptor) -> Option<(&'m str, &'m TypeRef)> {
        let payload = self.optional_payload(&method.return_type)?;
        let name = method.name.strip_prefix("Try").filter(|n| !n.is_empty())?;
        Some((name, payload))
    }

    /// Property name and declared type for a property method.
    ///
    /// `Try` and then `Get` are stripped from optional-returning methods,
    /// which are declared with the payload type. The flag is true in that
    /// case.
    #[must_use]
    pub fn property_shape<'m>(&self, method: &'m MethodDescriptor) -> (&'m str, &'m TypeRef, bool) {
        if let Some((name, payload)) = self.try_unwrap(method) {
            let name = name.strip_prefix("Get").unwrap_or(name);
            if !name.is_empty() {
                return (name, payload, true);
            }
        }
        (method.name.as_str(), &method.return_type, false)
    }
}
