//! XML model document parser.
//!
//! This module reads a contract description document into a
//! [`ModelDocument`]. Types are nested `<type>` elements, so generic
//! instantiations keep their structure all the way down.

use crate::error::ParseError;
use crate::model::ModelDocument;
use crate::types::{
    ContractDef, DefaultValue, MethodDescriptor, ParameterDescriptor, TypeRef, Visibility,
};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

/// Parses a model document from a string.
///
/// # Arguments
/// * `xml` - XML model content
///
/// # Returns
/// Parsed document or parse error.
///
/// # Errors
/// Returns `ParseError` if the XML is malformed or an element is missing
/// required information.
pub fn parse_model(xml: &str) -> Result<ModelDocument, ParseError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut document: Option<ModelDocument> = None;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => match element_name(e)?.as_str() {
                "model" => document = Some(ModelDocument::new()),
                "contract" => {
                    let doc = document
                        .as_mut()
                        .ok_or_else(|| ParseError::structure("contract outside of <model>"))?;
                    doc.add_contract(parse_contract(&mut reader, e)?);
                }
                _ => skip_element(&mut reader)?,
            },
            Ok(Event::Empty(ref e)) => match element_name(e)?.as_str() {
                "model" => document = Some(ModelDocument::new()),
                "contract" => {
                    let doc = document
                        .as_mut()
                        .ok_or_else(|| ParseError::structure("contract outside of <model>"))?;
                    doc.add_contract(contract_from_attrs(e)?);
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(ParseError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }

    document.ok_or_else(|| ParseError::structure("No model element found"))
}

/// Parses a model document from a file.
///
/// # Errors
/// Returns `ParseError` if the file cannot be read or parsed.
pub fn parse_model_file(path: &std::path::Path) -> Result<ModelDocument, ParseError> {
    let xml = std::fs::read_to_string(path)?;
    parse_model(&xml)
}

/// Parses the contract element attributes.
fn contract_from_attrs(e: &BytesStart<'_>) -> Result<ContractDef, ParseError> {
    let mut namespace = String::new();
    let mut name = None;

    for (key, value) in attributes(e)? {
        match key.as_str() {
            "namespace" => namespace = value,
            "name" => name = Some(value),
            _ => {}
        }
    }

    let name = name.ok_or_else(|| ParseError::missing_attr("contract", "name"))?;
    Ok(ContractDef::new(namespace, name))
}

/// Parses a contract and its methods.
fn parse_contract(
    reader: &mut Reader<&[u8]>,
    e: &BytesStart<'_>,
) -> Result<ContractDef, ParseError> {
    let mut contract = contract_from_attrs(e)?;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                if element_name(e)? == "method" {
                    contract.add_method(parse_method(reader, e)?);
                } else {
                    skip_element(reader)?;
                }
            }
            Ok(Event::Empty(ref e)) => {
                if element_name(e)? == "method" {
                    contract.add_method(method_from_attrs(e)?);
                }
            }
            Ok(Event::End(_)) => break,
            Ok(Event::Eof) => return Err(unclosed("contract")),
            Err(e) => return Err(ParseError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(contract)
}

/// Parses the method element attributes.
fn method_from_attrs(e: &BytesStart<'_>) -> Result<MethodDescriptor, ParseError> {
    let mut name = None;
    let mut is_static = false;
    let mut visibility = Visibility::Public;

    for (key, value) in attributes(e)? {
        match key.as_str() {
            "name" => name = Some(value),
            "static" => is_static = parse_bool("method", "static", &value)?,
            "visibility" => {
                visibility = Visibility::parse(&value)
                    .ok_or_else(|| ParseError::invalid_attr("method", "visibility", &value))?
            }
            _ => {}
        }
    }

    let name = name.ok_or_else(|| ParseError::missing_attr("method", "name"))?;
    let mut method = MethodDescriptor::new(name).visibility(visibility);
    method.is_static = is_static;
    Ok(method)
}

/// Parses a method with its return type and parameters.
fn parse_method(
    reader: &mut Reader<&[u8]>,
    e: &BytesStart<'_>,
) -> Result<MethodDescriptor, ParseError> {
    let mut method = method_from_attrs(e)?;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => match element_name(e)?.as_str() {
                "returns" => {
                    if let Some(ty) = parse_single_type(reader, "returns")? {
                        method.return_type = ty;
                    }
                }
                "parameter" => {
                    let parameter = parse_parameter(reader, e, &method.name)?;
                    method.parameters.push(parameter);
                }
                _ => skip_element(reader)?,
            },
            Ok(Event::Empty(ref e)) => {
                if element_name(e)? == "parameter" {
                    return Err(ParseError::structure(format!(
                        "parameter of method '{}' has no <type>",
                        method.name
                    )));
                }
            }
            Ok(Event::End(_)) => break,
            Ok(Event::Eof) => return Err(unclosed("method")),
            Err(e) => return Err(ParseError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(method)
}

/// Parses a parameter with its type and optional default value.
fn parse_parameter(
    reader: &mut Reader<&[u8]>,
    e: &BytesStart<'_>,
    method: &str,
) -> Result<ParameterDescriptor, ParseError> {
    let mut name = None;
    let mut is_output = false;

    for (key, value) in attributes(e)? {
        match key.as_str() {
            "name" => name = Some(value),
            "out" => is_output = parse_bool("parameter", "out", &value)?,
            _ => {}
        }
    }

    let name = name.ok_or_else(|| ParseError::missing_attr("parameter", "name"))?;
    let mut ty = None;
    let mut default = None;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => match element_name(e)?.as_str() {
                "type" => ty = Some(parse_type(reader, e)?),
                "default" => default = Some(parse_default(reader, e, true)?),
                _ => skip_element(reader)?,
            },
            Ok(Event::Empty(ref e)) => match element_name(e)?.as_str() {
                "type" => ty = Some(type_from_attrs(e)?),
                "default" => default = Some(parse_default(reader, e, false)?),
                _ => {}
            },
            Ok(Event::End(_)) => break,
            Ok(Event::Eof) => return Err(unclosed("parameter")),
            Err(e) => return Err(ParseError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }

    let ty = ty.ok_or_else(|| {
        ParseError::structure(format!(
            "parameter '{name}' of method '{method}' has no <type>"
        ))
    })?;

    let mut parameter = ParameterDescriptor::new(name, ty);
    parameter.is_output = is_output;
    parameter.default = default;
    Ok(parameter)
}

/// Parses a default value element.
///
/// `has_content` is true for a start tag, in which case the reader is
/// advanced past the matching end tag.
fn parse_default(
    reader: &mut Reader<&[u8]>,
    e: &BytesStart<'_>,
    has_content: bool,
) -> Result<DefaultValue, ParseError> {
    let mut kind = None;
    let mut value = None;

    for (key, v) in attributes(e)? {
        match key.as_str() {
            "kind" => kind = Some(v),
            "value" => value = Some(v),
            _ => {}
        }
    }

    let enum_type = if has_content {
        parse_single_type(reader, "default")?
    } else {
        None
    };

    let kind = kind.ok_or_else(|| ParseError::missing_attr("default", "kind"))?;
    let required = |value: Option<String>| {
        value.ok_or_else(|| ParseError::missing_attr("default", "value"))
    };

    match kind.as_str() {
        "null" => Ok(DefaultValue::Null),
        "bool" => {
            let value = required(value)?;
            Ok(DefaultValue::Bool(parse_bool("default", "value", &value)?))
        }
        "int" => {
            let value = required(value)?;
            value
                .parse()
                .map(DefaultValue::Int)
                .map_err(|_| ParseError::invalid_attr("default", "value", value))
        }
        "float" => {
            let value = required(value)?;
            value
                .parse()
                .map(DefaultValue::Float)
                .map_err(|_| ParseError::invalid_attr("default", "value", value))
        }
        "string" => Ok(DefaultValue::Str(value.unwrap_or_default())),
        "enum" => {
            let formatted = required(value)?;
            let enum_type = enum_type
                .ok_or_else(|| ParseError::structure("enum default value has no <type>"))?;
            Ok(DefaultValue::Enum {
                enum_type,
                formatted,
            })
        }
        "other" => Ok(DefaultValue::Other(required(value)?)),
        other => Err(ParseError::invalid_attr("default", "kind", other)),
    }
}

/// Reads the children of a wrapper element (`returns`, `default`) and
/// returns its single `<type>` child, if present.
fn parse_single_type(
    reader: &mut Reader<&[u8]>,
    context: &str,
) -> Result<Option<TypeRef>, ParseError> {
    let mut ty = None;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                if element_name(e)? == "type" {
                    ty = Some(parse_type(reader, e)?);
                } else {
                    skip_element(reader)?;
                }
            }
            Ok(Event::Empty(ref e)) => {
                if element_name(e)? == "type" {
                    ty = Some(type_from_attrs(e)?);
                }
            }
            Ok(Event::End(_)) => break,
            Ok(Event::Eof) => return Err(unclosed(context)),
            Err(e) => return Err(ParseError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(ty)
}

/// Parses the type element attributes.
fn type_from_attrs(e: &BytesStart<'_>) -> Result<TypeRef, ParseError> {
    let mut namespace = String::new();
    let mut name = None;
    let mut rank = 0u8;

    for (key, value) in attributes(e)? {
        match key.as_str() {
            "namespace" => namespace = value,
            "name" => name = Some(value),
            "rank" => {
                rank = value
                    .parse()
                    .map_err(|_| ParseError::invalid_attr("type", "rank", &value))?
            }
            _ => {}
        }
    }

    let name = name.ok_or_else(|| ParseError::missing_attr("type", "name"))?;
    Ok(TypeRef::new(namespace, name).with_array_rank(rank))
}

/// Parses a type element whose children are its type arguments.
fn parse_type(reader: &mut Reader<&[u8]>, e: &BytesStart<'_>) -> Result<TypeRef, ParseError> {
    let mut ty = type_from_attrs(e)?;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                if element_name(e)? == "type" {
                    ty.arguments.push(parse_type(reader, e)?);
                } else {
                    skip_element(reader)?;
                }
            }
            Ok(Event::Empty(ref e)) => {
                if element_name(e)? == "type" {
                    ty.arguments.push(type_from_attrs(e)?);
                }
            }
            Ok(Event::End(_)) => break,
            Ok(Event::Eof) => return Err(unclosed("type")),
            Err(e) => return Err(ParseError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(ty)
}

/// Returns the local name of an element.
fn element_name(e: &BytesStart<'_>) -> Result<String, ParseError> {
    Ok(std::str::from_utf8(e.name().as_ref())?.to_string())
}

/// Collects an element's attributes as owned key/value pairs.
fn attributes(e: &BytesStart<'_>) -> Result<Vec<(String, String)>, ParseError> {
    let mut out = Vec::new();
    for attr in e.attributes().flatten() {
        let key = std::str::from_utf8(attr.key.as_ref())?;
        let value = attr.unescape_value()?;
        out.push((key.to_string(), value.into_owned()));
    }
    Ok(out)
}

fn parse_bool(element: &str, attribute: &str, value: &str) -> Result<bool, ParseError> {
    match value.to_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(ParseError::invalid_attr(element, attribute, value)),
    }
}

fn unclosed(element: &str) -> ParseError {
    ParseError::structure(format!("unexpected end of document inside <{element}>"))
}

/// Skips to the end of the current element.
fn skip_element(reader: &mut Reader<&[u8]>) -> Result<(), ParseError> {
    let mut buf = Vec::new();
    let mut depth = 1;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(_)) => depth += 1,
            Ok(Event::End(_)) => {
                depth -= 1;
                if depth == 0 {
                    break;
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(ParseError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TypeDescriptorModel;

    const SIMPLE_MODEL: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<model>
    <contract namespace="IoFluently" name="IIoService">
        <method name="TryGetSize">
            <returns>
                <type namespace="SimpleMonads" name="IMaybe`1">
                    <type namespace="UnitsNet" name="Information"/>
                </type>
            </returns>
            <parameter name="path">
                <type namespace="IoFluently" name="AbsolutePath"/>
            </parameter>
        </method>
        <method name="DeleteFile" static="true" visibility="internal">
            <parameter name="path">
                <type namespace="IoFluently" name="AbsolutePath"/>
            </parameter>
            <parameter name="bytes" out="true">
                <type namespace="System" name="Byte" rank="1"/>
            </parameter>
            <parameter name="options">
                <type namespace="System.IO" name="FileOptions"/>
                <default kind="enum" value="Asynchronous, WriteThrough">
                    <type namespace="System.IO" name="FileOptions"/>
                </default>
            </parameter>
            <parameter name="recursive">
                <type namespace="System" name="Boolean"/>
                <default kind="bool" value="false"/>
            </parameter>
        </method>
        <method name="Nothing"/>
    </contract>
</model>"#;

    #[test]
    fn test_parse_simple_model() {
        let doc = parse_model(SIMPLE_MODEL).expect("Failed to parse model");

        assert_eq!(doc.contracts.len(), 1);
        let contract = &doc.contracts[0];
        assert_eq!(contract.namespace, "IoFluently");
        assert_eq!(contract.name, "IIoService");
        assert_eq!(contract.methods.len(), 3);
    }

    #[test]
    fn test_parse_generic_return_type() {
        let doc = parse_model(SIMPLE_MODEL).expect("Failed to parse model");
        let method = &doc.methods("IIoService").expect("contract")[0];

        assert_eq!(method.name, "TryGetSize");
        assert_eq!(method.return_type.name, "IMaybe`1");
        assert_eq!(
            method.return_type.arguments,
            vec![TypeRef::new("UnitsNet", "Information")]
        );
        assert!(!method.is_static);
        assert_eq!(method.visibility, Visibility::Public);
    }

    #[test]
    fn test_parse_parameters() {
        let doc = parse_model(SIMPLE_MODEL).expect("Failed to parse model");
        let method = &doc.contracts[0].methods[1];

        assert!(method.is_static);
        assert_eq!(method.visibility, Visibility::NonPublic);
        assert!(method.return_type.is_void());
        assert_eq!(method.parameters.len(), 4);

        let bytes = &method.parameters[1];
        assert!(bytes.is_output);
        assert_eq!(bytes.ty.array_rank, 1);

        let options = &method.parameters[2];
        assert_eq!(
            options.default,
            Some(DefaultValue::Enum {
                enum_type: TypeRef::new("System.IO", "FileOptions"),
                formatted: "Asynchronous, WriteThrough".to_string(),
            })
        );
        assert_eq!(method.parameters[3].default, Some(DefaultValue::Bool(false)));
    }

    #[test]
    fn test_parse_empty_method_is_void() {
        let doc = parse_model(SIMPLE_MODEL).expect("Failed to parse model");
        let method = &doc.contracts[0].methods[2];
        assert_eq!(method.name, "Nothing");
        assert!(method.parameters.is_empty());
        assert!(method.return_type.is_void());
    }

    #[test]
    fn test_parse_defaults() {
        let xml = r#"<model><contract name="C"><method name="M">
            <parameter name="a"><type name="String"/><default kind="string" value="*.txt"/></parameter>
            <parameter name="b"><type name="Int32"/><default kind="int" value="-4"/></parameter>
            <parameter name="c"><type name="Double"/><default kind="float" value="1.5"/></parameter>
            <parameter name="d"><type name="Object"/><default kind="null"/></parameter>
            <parameter name="e"><type name="Char"/><default kind="other" value="x"/></parameter>
        </method></contract></model>"#;

        let doc = parse_model(xml).expect("Failed to parse model");
        let defaults: Vec<_> = doc.contracts[0].methods[0]
            .parameters
            .iter()
            .map(|p| p.default.clone())
            .collect();

        assert_eq!(
            defaults,
            vec![
                Some(DefaultValue::Str("*.txt".to_string())),
                Some(DefaultValue::Int(-4)),
                Some(DefaultValue::Float(1.5)),
                Some(DefaultValue::Null),
                Some(DefaultValue::Other("x".to_string())),
            ]
        );
    }

    #[test]
    fn test_parse_escaped_string_default() {
        let xml = r#"<model><contract name="C"><method name="M">
            <parameter name="a"><type name="String"/><default kind="string" value="a &quot;b&quot; &amp; c &lt;d&gt;"/></parameter>
        </method></contract></model>"#;

        let doc = parse_model(xml).expect("Failed to parse model");
        assert_eq!(
            doc.contracts[0].methods[0].parameters[0].default,
            Some(DefaultValue::Str(r#"a "b" & c <d>"#.to_string()))
        );
    }

    #[test]
    fn test_missing_model_root() {
        let err = parse_model("<contracts/>").unwrap_err();
        assert!(matches!(err, ParseError::InvalidStructure { .. }));
    }

    #[test]
    fn test_missing_contract_name() {
        let err = parse_model(r#"<model><contract namespace="X"/></model>"#).unwrap_err();
        assert!(matches!(err, ParseError::MissingAttribute { .. }));
    }

    #[test]
    fn test_parameter_without_type() {
        let xml = r#"<model><contract name="C"><method name="M">
            <parameter name="a"></parameter>
        </method></contract></model>"#;
        let err = parse_model(xml).unwrap_err();
        assert!(err.to_string().contains("has no <type>"));
    }

    #[test]
    fn test_invalid_visibility() {
        let xml = r#"<model><contract name="C"><method name="M" visibility="sealed"/></contract></model>"#;
        let err = parse_model(xml).unwrap_err();
        assert!(matches!(err, ParseError::InvalidAttribute { .. }));
    }

    #[test]
    fn test_enum_default_requires_type() {
        let xml = r#"<model><contract name="C"><method name="M">
            <parameter name="a"><type name="Opts"/><default kind="enum" value="A"/></parameter>
        </method></contract></model>"#;
        assert!(parse_model(xml).is_err());
    }

    #[test]
    fn test_unknown_elements_are_skipped() {
        let xml = r#"<model><contract name="C">
            <docs><para>ignored</para></docs>
            <method name="M"><attribute><x/></attribute></method>
        </contract></model>"#;
        let doc = parse_model(xml).expect("Failed to parse model");
        assert_eq!(doc.contracts[0].methods.len(), 1);
    }
}
