//! Type name and literal rendering.

use fluentgen_model::types::{DefaultValue, SYSTEM_NAMESPACE, TypeRef, strip_arity};

/// Returns the keyword spelling of a built-in `System` type.
#[must_use]
pub fn primitive_keyword(name: &str) -> Option<&'static str> {
    match name {
        "Int64" => Some("long"),
        "Int32" => Some("int"),
        "Int16" => Some("short"),
        "UInt64" => Some("ulong"),
        "UInt32" => Some("uint"),
        "UInt16" => Some("ushort"),
        "Byte" => Some("byte"),
        "SByte" => Some("sbyte"),
        "String" => Some("string"),
        "Void" => Some("void"),
        "Boolean" => Some("bool"),
        "Char" => Some("char"),
        "Single" => Some("float"),
        "Double" => Some("double"),
        "Decimal" => Some("decimal"),
        "Object" => Some("object"),
        _ => None,
    }
}

/// Renders type references as source type names.
#[derive(Debug, Clone, Copy, Default)]
pub struct TypeRenderer {
    qualify: bool,
}

impl TypeRenderer {
    /// Creates a renderer. With `qualify` set, non-primitive names carry
    /// their namespace.
    #[must_use]
    pub const fn new(qualify: bool) -> Self {
        Self { qualify }
    }

    /// Renders a type reference, recursing into type arguments.
    #[must_use]
    pub fn render(&self, ty: &TypeRef) -> String {
        let mut output = self.render_element(ty);
        match ty.array_rank {
            0 => {}
            rank => {
                output.push('[');
                output.push_str(&",".repeat(usize::from(rank) - 1));
                output.push(']');
            }
        }
        output
    }

    fn render_element(&self, ty: &TypeRef) -> String {
        if ty.namespace == SYSTEM_NAMESPACE && !ty.is_generic() {
            if let Some(keyword) = primitive_keyword(&ty.name) {
                return keyword.to_string();
            }
        }

        let mut output = if self.qualify {
            strip_arity(&ty.qualified_name()).to_string()
        } else {
            ty.bare_name().to_string()
        };

        if ty.is_generic() {
            let arguments: Vec<String> = ty.arguments.iter().map(|a| self.render(a)).collect();
            output.push('<');
            output.push_str(&arguments.join(", "));
            output.push('>');
        }

        output
    }

    /// Renders a parameter default value as a source literal.
    #[must_use]
    pub fn render_default(&self, value: &DefaultValue) -> String {
        match value {
            DefaultValue::Null => "null".to_string(),
            DefaultValue::Bool(b) => b.to_string(),
            DefaultValue::Int(i) => i.to_string(),
            DefaultValue::Float(f) => render_float(*f),
            DefaultValue::Str(s) => format!("@\"{}\"", s.replace('"', "\"\"")),
            DefaultValue::Enum {
                enum_type,
                formatted,
            } => {
                let type_name = self.render(enum_type);
                formatted
                    .split(',')
                    .map(str::trim)
                    .map(|segment| {
                        if segment.starts_with('-') && segment.parse::<i64>().is_ok() {
                            format!("({type_name})({segment})")
                        } else if segment.parse::<i64>().is_ok() {
                            format!("({type_name}){segment}")
                        } else {
                            format!("{type_name}.{segment}")
                        }
                    })
                    .collect::<Vec<_>>()
                    .join(" | ")
            }
            DefaultValue::Other(s) => s.clone(),
        }
    }
}

fn render_float(f: f64) -> String {
    if f.is_nan() {
        "double.NaN".to_string()
    } else if f == f64::INFINITY {
        "double.PositiveInfinity".to_string()
    } else if f == f64::NEG_INFINITY {
        "double.NegativeInfinity".to_string()
    } else {
        // Debug keeps a fraction or switches to exponent form, so the
        // literal never reads as an integral constant
        format!("{f:?}")
    }
}
