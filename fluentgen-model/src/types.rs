//! Descriptor type definitions.
//!
//! This module contains the data structures describing a service contract:
//! type references, parameters, methods and the contract itself.

use std::fmt;

/// Namespace that holds the built-in runtime types (`Void`, `Int32`, ...).
pub const SYSTEM_NAMESPACE: &str = "System";

/// Qualified identity of a type, without its type arguments.
///
/// Ordering is by namespace, then name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TypeIdentifier {
    /// Owning namespace (may be empty).
    pub namespace: String,
    /// Type name, possibly carrying a generic arity marker (`IMaybe`1`).
    pub name: String,
}

impl TypeIdentifier {
    /// Creates a new type identifier.
    #[must_use]
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }

    /// Returns the name with any generic arity marker removed.
    #[must_use]
    pub fn bare_name(&self) -> &str {
        strip_arity(&self.name)
    }
}

impl fmt::Display for TypeIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.namespace.is_empty() {
            f.write_str(&self.name)
        } else {
            write!(f, "{}.{}", self.namespace, self.name)
        }
    }
}

/// Reference to a (possibly generic, possibly array) type.
///
/// Two references are equal iff their identifiers, array ranks and argument
/// lists are equal, recursively.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TypeRef {
    /// Owning namespace.
    pub namespace: String,
    /// Type name as reported by the model.
    pub name: String,
    /// Generic type arguments, in order.
    pub arguments: Vec<TypeRef>,
    /// Array rank (0 for non-array types).
    pub array_rank: u8,
}

impl TypeRef {
    /// Creates a non-generic type reference.
    #[must_use]
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
            arguments: Vec::new(),
            array_rank: 0,
        }
    }

    /// Creates a generic type instantiation.
    #[must_use]
    pub fn generic(
        namespace: impl Into<String>,
        name: impl Into<String>,
        arguments: Vec<TypeRef>,
    ) -> Self {
        Self {
            arguments,
            ..Self::new(namespace, name)
        }
    }

    /// Creates a reference to a built-in `System` type.
    #[must_use]
    pub fn system(name: impl Into<String>) -> Self {
        Self::new(SYSTEM_NAMESPACE, name)
    }

    /// The type of methods that return no value.
    #[must_use]
    pub fn void() -> Self {
        Self::system("Void")
    }

    /// Returns this type as an array of the given rank.
    #[must_use]
    pub fn with_array_rank(mut self, rank: u8) -> Self {
        self.array_rank = rank;
        self
    }

    /// Returns the identifier of this type, ignoring arguments.
    #[must_use]
    pub fn identifier(&self) -> TypeIdentifier {
        TypeIdentifier::new(self.namespace.clone(), self.name.clone())
    }

    /// Returns `Namespace.Name`, or just the name without a namespace.
    #[must_use]
    pub fn qualified_name(&self) -> String {
        if self.namespace.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.namespace, self.name)
        }
    }

    /// Returns the name with any generic arity marker removed.
    #[must_use]
    pub fn bare_name(&self) -> &str {
        strip_arity(&self.name)
    }

    /// Returns true if this is the void type.
    #[must_use]
    pub fn is_void(&self) -> bool {
        self.namespace == SYSTEM_NAMESPACE && self.name == "Void" && !self.is_array()
    }

    /// Returns true if this type has type arguments.
    #[must_use]
    pub fn is_generic(&self) -> bool {
        !self.arguments.is_empty()
    }

    /// Returns true if this is an array type.
    #[must_use]
    pub const fn is_array(&self) -> bool {
        self.array_rank > 0
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.qualified_name())?;
        if self.is_generic() {
            f.write_str("<")?;
            for (i, arg) in self.arguments.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{arg}")?;
            }
            f.write_str(">")?;
        }
        for _ in 0..self.array_rank {
            f.write_str("[]")?;
        }
        Ok(())
    }
}

/// Strips a generic arity marker (everything from the first backtick).
#[must_use]
pub fn strip_arity(name: &str) -> &str {
    name.split('`').next().unwrap_or(name)
}

/// Method visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Visibility {
    /// Visible to every caller.
    #[default]
    Public,
    /// Internal, private or protected.
    NonPublic,
}

impl Visibility {
    /// Parses a visibility keyword.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "public" => Some(Self::Public),
            "nonpublic" | "non-public" | "internal" | "private" | "protected" => {
                Some(Self::NonPublic)
            }
            _ => None,
        }
    }
}

/// Default value of an optional parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum DefaultValue {
    /// The null reference.
    Null,
    /// Boolean literal.
    Bool(bool),
    /// Integer literal.
    Int(i64),
    /// Floating point literal.
    Float(f64),
    /// String literal (unescaped contents).
    Str(String),
    /// Enum value.
    Enum {
        /// The enum type.
        enum_type: TypeRef,
        /// Formatted flag names, comma separated (`Hidden, System`).
        formatted: String,
    },
    /// Any other value, kept as its string form.
    Other(String),
}

/// Parameter of a contract method.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterDescriptor {
    /// Parameter name.
    pub name: String,
    /// Parameter type.
    pub ty: TypeRef,
    /// Whether this is an output parameter.
    pub is_output: bool,
    /// Default value, if the parameter is optional.
    pub default: Option<DefaultValue>,
}

impl ParameterDescriptor {
    /// Creates a new required input parameter.
    #[must_use]
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
            is_output: false,
            default: None,
        }
    }

    /// Marks the parameter as an output parameter.
    #[must_use]
    pub fn output(mut self) -> Self {
        self.is_output = true;
        self
    }

    /// Gives the parameter a default value.
    #[must_use]
    pub fn with_default(mut self, value: DefaultValue) -> Self {
        self.default = Some(value);
        self
    }

    /// Returns true if the parameter has a default value.
    #[must_use]
    pub const fn has_default_value(&self) -> bool {
        self.default.is_some()
    }
}

/// Method declared on a contract.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodDescriptor {
    /// Method name.
    pub name: String,
    /// Parameters in declaration order.
    pub parameters: Vec<ParameterDescriptor>,
    /// Return type (`System.Void` when nothing is returned).
    pub return_type: TypeRef,
    /// Whether the method is static.
    pub is_static: bool,
    /// Method visibility.
    pub visibility: Visibility,
}

impl MethodDescriptor {
    /// Creates a public, non-static, void method with no parameters.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parameters: Vec::new(),
            return_type: TypeRef::void(),
            is_static: false,
            visibility: Visibility::Public,
        }
    }

    /// Appends a parameter.
    #[must_use]
    pub fn param(mut self, parameter: ParameterDescriptor) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Sets the return type.
    #[must_use]
    pub fn returns(mut self, ty: TypeRef) -> Self {
        self.return_type = ty;
        self
    }

    /// Marks the method static.
    #[must_use]
    pub fn static_method(mut self) -> Self {
        self.is_static = true;
        self
    }

    /// Sets the visibility.
    #[must_use]
    pub fn visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    /// Returns the first parameter, if any.
    #[must_use]
    pub fn first_parameter(&self) -> Option<&ParameterDescriptor> {
        self.parameters.first()
    }
}

/// A contract type and its declared methods.
#[derive(Debug, Clone, PartialEq)]
pub struct ContractDef {
    /// Owning namespace.
    pub namespace: String,
    /// Contract name.
    pub name: String,
    /// Methods in declaration order.
    pub methods: Vec<MethodDescriptor>,
}

impl ContractDef {
    /// Creates an empty contract.
    #[must_use]
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
            methods: Vec::new(),
        }
    }

    /// Appends a method.
    pub fn add_method(&mut self, method: MethodDescriptor) {
        self.methods.push(method);
    }

    /// Returns the contract's identifier.
    #[must_use]
    pub fn identifier(&self) -> TypeIdentifier {
        TypeIdentifier::new(self.namespace.clone(), self.name.clone())
    }

    /// Returns true if `name` (bare or qualified) refers to this contract.
    #[must_use]
    pub fn matches(&self, name: &str) -> bool {
        name == self.name || name == self.identifier().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn maybe(arg: TypeRef) -> TypeRef {
        TypeRef::generic("SimpleMonads", "IMaybe`1", vec![arg])
    }

    #[test]
    fn test_type_ref_equality_is_structural() {
        let a = maybe(TypeRef::system("Int64"));
        let b = maybe(TypeRef::system("Int64"));
        let c = maybe(TypeRef::system("Int32"));

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.identifier(), c.identifier());
    }

    #[test]
    fn test_type_ref_array_differs_from_element() {
        let byte = TypeRef::system("Byte");
        assert_ne!(byte.clone().with_array_rank(1), byte);
        assert!(byte.with_array_rank(1).is_array());
    }

    #[test]
    fn test_void() {
        assert!(TypeRef::void().is_void());
        assert!(!TypeRef::new("Other", "Void").is_void());
        assert!(!TypeRef::void().with_array_rank(1).is_void());
    }

    #[test]
    fn test_strip_arity() {
        assert_eq!(strip_arity("IMaybe`1"), "IMaybe");
        assert_eq!(strip_arity("AbsolutePath"), "AbsolutePath");
        assert_eq!(maybe(TypeRef::void()).bare_name(), "IMaybe");
    }

    #[test]
    fn test_identifier_ordering() {
        let mut ids = vec![
            TypeIdentifier::new("IoFluently", "RelativePath"),
            TypeIdentifier::new("IoFluently", "AbsolutePath"),
            TypeIdentifier::new("Abc", "Zed"),
        ];
        ids.sort();
        let names: Vec<String> = ids.iter().map(ToString::to_string).collect();
        assert_eq!(
            names,
            ["Abc.Zed", "IoFluently.AbsolutePath", "IoFluently.RelativePath"]
        );
    }

    #[test]
    fn test_type_ref_display() {
        let ty = TypeRef::generic(
            "System.Collections.Generic",
            "IEnumerable`1",
            vec![TypeRef::system("String")],
        );
        assert_eq!(
            ty.to_string(),
            "System.Collections.Generic.IEnumerable`1<System.String>"
        );
    }

    #[test]
    fn test_visibility_parse() {
        assert_eq!(Visibility::parse("Public"), Some(Visibility::Public));
        assert_eq!(Visibility::parse("internal"), Some(Visibility::NonPublic));
        assert_eq!(Visibility::parse("sealed"), None);
    }

    #[test]
    fn test_method_builder() {
        let method = MethodDescriptor::new("Exists")
            .param(ParameterDescriptor::new(
                "path",
                TypeRef::new("IoFluently", "AbsolutePath"),
            ))
            .returns(TypeRef::system("Boolean"));

        assert_eq!(method.parameters.len(), 1);
        assert!(!method.is_static);
        assert_eq!(method.visibility, Visibility::Public);
        assert_eq!(
            method.first_parameter().map(|p| p.name.as_str()),
            Some("path")
        );
    }

    #[test]
    fn test_contract_matches() {
        let contract = ContractDef::new("IoFluently", "IIoService");
        assert!(contract.matches("IIoService"));
        assert!(contract.matches("IoFluently.IIoService"));
        assert!(!contract.matches("Other.IIoService"));
    }
}
