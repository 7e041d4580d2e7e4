//! The type descriptor model consumed by code generation.
//!
//! Generation never talks to a live type system. It asks a
//! [`TypeDescriptorModel`] for the methods of a contract, so tests can hand
//! in fixture descriptors and the CLI can hand in a parsed model document.

use crate::error::ModelError;
use crate::types::{ContractDef, MethodDescriptor};

/// Read-only source of contract descriptions.
pub trait TypeDescriptorModel {
    /// Lists the methods of `contract` in declaration order.
    ///
    /// `contract` may be a bare name or a namespace-qualified name.
    ///
    /// # Errors
    /// Returns `ModelError::ContractNotFound` if the model does not describe
    /// the contract.
    fn methods(&self, contract: &str) -> Result<&[MethodDescriptor], ModelError>;
}

/// A set of contract descriptions, usually parsed from an XML document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelDocument {
    /// Described contracts, in document order.
    pub contracts: Vec<ContractDef>,
}

impl ModelDocument {
    /// Creates an empty document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a contract description.
    pub fn add_contract(&mut self, contract: ContractDef) {
        self.contracts.push(contract);
    }

    /// Looks up a contract by bare or qualified name.
    ///
    /// A qualified match wins over a bare-name match.
    #[must_use]
    pub fn get_contract(&self, name: &str) -> Option<&ContractDef> {
        self.contracts
            .iter()
            .find(|c| c.identifier().to_string() == name)
            .or_else(|| self.contracts.iter().find(|c| c.matches(name)))
    }
}

impl TypeDescriptorModel for ModelDocument {
    fn methods(&self, contract: &str) -> Result<&[MethodDescriptor], ModelError> {
        self.get_contract(contract)
            .map(|c| c.methods.as_slice())
            .ok_or_else(|| ModelError::ContractNotFound {
                name: contract.to_string(),
            })
    }
}

impl TypeDescriptorModel for ContractDef {
    fn methods(&self, contract: &str) -> Result<&[MethodDescriptor], ModelError> {
        if self.matches(contract) {
            Ok(&self.methods)
        } else {
            Err(ModelError::ContractNotFound {
                name: contract.to_string(),
            })
        }
    }
}
