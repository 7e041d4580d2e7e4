//! Model validation utilities.
//!
//! These checks catch documents that parse but could never produce sensible
//! generated code: unnamed elements, unnamed types and duplicate parameter
//! names.

use crate::error::ModelError;
use crate::model::ModelDocument;
use crate::types::{ContractDef, DefaultValue, MethodDescriptor, TypeRef};
use std::collections::HashSet;

/// Validates a parsed model document.
///
/// # Errors
/// Returns `ModelError::Validation` describing the first problem found.
pub fn validate_model(document: &ModelDocument) -> Result<(), ModelError> {
    for contract in &document.contracts {
        validate_contract(contract)?;
    }
    Ok(())
}

/// Validates a single contract.
///
/// # Errors
/// Returns `ModelError::Validation` describing the first problem found.
pub fn validate_contract(contract: &ContractDef) -> Result<(), ModelError> {
    if contract.name.is_empty() {
        return Err(ModelError::validation(
            contract.namespace.clone(),
            "contract name is empty",
        ));
    }

    let context = contract.identifier().to_string();
    for method in &contract.methods {
        validate_method(&context, method)?;
    }
    Ok(())
}

fn validate_method(contract: &str, method: &MethodDescriptor) -> Result<(), ModelError> {
    if method.name.is_empty() {
        return Err(ModelError::validation(contract, "method name is empty"));
    }

    let context = format!("{contract}.{}", method.name);
    validate_type(&context, &method.return_type)?;

    let mut seen_names = HashSet::new();
    for parameter in &method.parameters {
        if parameter.name.is_empty() {
            return Err(ModelError::validation(&context, "parameter name is empty"));
        }

        if !seen_names.insert(parameter.name.as_str()) {
            return Err(ModelError::validation(
                &context,
                format!("duplicate parameter name '{}'", parameter.name),
            ));
        }

        validate_type(&context, &parameter.ty)?;
        if let Some(DefaultValue::Enum { enum_type, .. }) = &parameter.default {
            validate_type(&context, enum_type)?;
        }
    }

    Ok(())
}

fn validate_type(context: &str, ty: &TypeRef) -> Result<(), ModelError> {
    if ty.name.is_empty() {
        return Err(ModelError::validation(context, "type name is empty"));
    }
    for argument in &ty.arguments {
        validate_type(context, argument)?;
    }
    Ok(())
}
