//! Generator configuration.
//!
//! Every policy the generator applies (receiver allow-lists, excluded verbs,
//! the optional type, preamble, output names) comes from a
//! [`GeneratorConfig`] handed in at construction time.

use fluentgen_model::ParseError;
use fluentgen_model::types::{TypeIdentifier, TypeRef, strip_arity};
use quick_xml::Reader;
use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::{BytesStart, Event};

/// Matches type references by bare name or by qualified name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeMatcher {
    /// Required namespace, if the matcher was qualified.
    pub namespace: Option<String>,
    /// Bare type name.
    pub name: String,
}

impl TypeMatcher {
    /// Parses `Name` or `Namespace.Name`. The namespace is everything before
    /// the last dot.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        let s = s.trim();
        match s.rsplit_once('.') {
            Some((namespace, name)) => Self {
                namespace: Some(namespace.to_string()),
                name: strip_arity(name).to_string(),
            },
            None => Self {
                namespace: None,
                name: strip_arity(s).to_string(),
            },
        }
    }

    /// Returns true if the identifier matches.
    #[must_use]
    pub fn matches(&self, id: &TypeIdentifier) -> bool {
        id.bare_name() == self.name
            && self
                .namespace
                .as_ref()
                .is_none_or(|namespace| *namespace == id.namespace)
    }

    /// Returns true if the type's identifier matches.
    #[must_use]
    pub fn matches_type(&self, ty: &TypeRef) -> bool {
        self.matches(&ty.identifier())
    }
}

/// A name fragment that disqualifies a method from becoming a property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerbExclusion {
    /// Fragment that excludes the method when contained in its name.
    pub marker: String,
    /// Fragment that lifts the exclusion when also contained in the name.
    pub unless: Option<String>,
}

impl VerbExclusion {
    /// Creates an unconditional exclusion.
    #[must_use]
    pub fn new(marker: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
            unless: None,
        }
    }

    /// Adds an exemption fragment.
    #[must_use]
    pub fn unless(mut self, exemption: impl Into<String>) -> Self {
        self.unless = Some(exemption.into());
        self
    }

    /// Returns true if this rule excludes `name`.
    #[must_use]
    pub fn excludes(&self, name: &str) -> bool {
        name.contains(&self.marker)
            && self
                .unless
                .as_ref()
                .is_none_or(|exemption| !name.contains(exemption.as_str()))
    }
}

/// How a property generated from a `Try...` method returning the optional
/// type is emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OptionalPropertyMode {
    /// Declare the payload type and extract the payload in the body.
    #[default]
    Unwrap,
    /// Declare the payload type but return the raw optional from the body.
    ///
    /// This reproduces output of older generators and does not type-check.
    Raw,
}

impl OptionalPropertyMode {
    /// Parses a mode keyword.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "unwrap" => Some(Self::Unwrap),
            "raw" => Some(Self::Raw),
            _ => None,
        }
    }
}

/// Complete generator configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorConfig {
    /// Types that may receive generated properties.
    pub property_receivers: Vec<TypeMatcher>,
    /// Types that may receive extension wrappers.
    pub extension_hosts: Vec<TypeMatcher>,
    /// Name fragments that keep a method from becoming a property.
    pub excluded_markers: Vec<VerbExclusion>,
    /// Exact names that keep a method from becoming a property.
    pub excluded_names: Vec<String>,
    /// Receiver emitted as a partial interface instead of a partial class.
    pub capability_receiver: String,
    /// Bare name of the optional ("maybe") type.
    pub optional_binder: String,
    /// Member on a receiver that yields the service instance.
    pub service_accessor: String,
    /// Member on the optional type that yields its payload.
    pub payload_accessor: String,
    /// Emission mode for optional-returning properties.
    pub optional_property_mode: OptionalPropertyMode,
    /// Whether rendered type names carry their namespace.
    pub qualify_type_names: bool,
    /// Namespaces imported at the top of both generated files.
    pub preamble: Vec<String>,
    /// Namespace of the generated extension class.
    pub extensions_namespace: String,
    /// Name of the generated extension class.
    pub extensions_class: String,
    /// Summary documentation lines for the extension class.
    pub extensions_summary: Vec<String>,
    /// File name of the generated properties file.
    pub properties_file_name: String,
    /// File name of the generated extensions file.
    pub extensions_file_name: String,
}

const PATH_TYPES: [&str; 10] = [
    "AbsolutePath",
    "RelativePath",
    "IAbsolutePathTranslation",
    "IHasAbsolutePath",
    "File",
    "Folder",
    "MissingPath",
    "FileOrMissingPath",
    "FolderOrMissingPath",
    "FileOrFolder",
];

impl GeneratorConfig {
    /// Profile for the IoFluently path library: properties and extensions on
    /// path types, forwarding to `IIoService`.
    #[must_use]
    pub fn io_fluently() -> Self {
        let path_types = || {
            PATH_TYPES
                .iter()
                .map(|name| TypeMatcher::parse(&format!("IoFluently.{name}")))
                .collect::<Vec<_>>()
        };

        Self {
            property_receivers: path_types(),
            extension_hosts: path_types(),
            excluded_markers: vec![
                VerbExclusion::new("Open"),
                VerbExclusion::new("Clear"),
                VerbExclusion::new("Delete"),
                VerbExclusion::new("Ensure"),
                VerbExclusion::new("Observe"),
                VerbExclusion::new("Read").unless("ReadOnly"),
                VerbExclusion::new("Set"),
            ],
            excluded_names: ["Decrypt", "Encrypt", "Renamings", "Simplify"]
                .map(String::from)
                .to_vec(),
            capability_receiver: "IHasAbsolutePath".to_string(),
            optional_binder: "IMaybe".to_string(),
            service_accessor: "IoService".to_string(),
            payload_accessor: "Value".to_string(),
            optional_property_mode: OptionalPropertyMode::Unwrap,
            qualify_type_names: false,
            preamble: [
                "System",
                "System.Collections.Generic",
                "System.Threading.Tasks",
                "System.Threading",
                "System.IO",
                "System.Linq",
                "System.Net.Http.Headers",
                "System.Reactive",
                "System.Text",
                "LiveLinq.Dictionary",
                "LiveLinq.Set",
                "SimpleMonads",
                "TreeLinq",
                "UnitsNet",
            ]
            .map(String::from)
            .to_vec(),
            extensions_namespace: "IoFluently".to_string(),
            extensions_class: "IoExtensions".to_string(),
            extensions_summary: vec![
                "Contains extension methods on path types that wrap methods on the object's IoService property."
                    .to_string(),
                "That is, myAbsolutePath.RelativeTo(parameter1) is equivalent to".to_string(),
                "myAbsolutePath.IoService.RelativeTo(myAbsolutePath, parameter1), which keeps the syntax fluent"
                    .to_string(),
                "while allowing the IIoService to be dependency injectable.".to_string(),
            ],
            properties_file_name: "PartialClasses.g.cs".to_string(),
            extensions_file_name: "IoExtensions.g.cs".to_string(),
        }
    }

    /// An empty profile: nothing is eligible until allow-lists are added.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            property_receivers: Vec::new(),
            extension_hosts: Vec::new(),
            excluded_markers: Vec::new(),
            excluded_names: Vec::new(),
            preamble: Vec::new(),
            extensions_summary: Vec::new(),
            ..Self::io_fluently()
        }
    }

    /// Sets the property receiver allow-list.
    #[must_use]
    pub fn with_property_receivers<I, S>(mut self, receivers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.property_receivers = receivers
            .into_iter()
            .map(|r| TypeMatcher::parse(r.as_ref()))
            .collect();
        self
    }

    /// Sets the extension host allow-list.
    #[must_use]
    pub fn with_extension_hosts<I, S>(mut self, hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.extension_hosts = hosts
            .into_iter()
            .map(|h| TypeMatcher::parse(h.as_ref()))
            .collect();
        self
    }

    /// Sets the optional property emission mode.
    #[must_use]
    pub fn with_optional_property_mode(mut self, mode: OptionalPropertyMode) -> Self {
        self.optional_property_mode = mode;
        self
    }

    /// Loads a profile from an XML `<generator>` document. Elements that
    /// are absent keep their [`GeneratorConfig::io_fluently`] values; list
    /// elements that are present replace the default list.
    ///
    /// # Errors
    /// Returns `ParseError` if the document is malformed.
    pub fn from_xml(xml: &str) -> Result<Self, ParseError> {
        // text is trimmed per element in `read_text`; trimming each event
        // would drop the spaces around entity references
        let mut reader = Reader::from_str(xml);

        let mut config = Self::io_fluently();
        let mut found_root = false;
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) => {
                    let name = element_name(e)?;
                    if name == "generator" {
                        found_root = true;
                    } else if found_root {
                        config.apply_element(&mut reader, &name, e)?;
                    }
                }
                Ok(Event::Empty(ref e)) => {
                    let name = element_name(e)?;
                    if name == "generator" {
                        found_root = true;
                    } else if found_root {
                        config.apply_empty(&name, e)?;
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(ParseError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        if found_root {
            Ok(config)
        } else {
            Err(ParseError::structure("No generator element found"))
        }
    }

    /// Loads a profile from an XML file.
    ///
    /// # Errors
    /// Returns `ParseError` if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> Result<Self, ParseError> {
        let xml = std::fs::read_to_string(path)?;
        Self::from_xml(&xml)
    }

    fn apply_element(
        &mut self,
        reader: &mut Reader<&[u8]>,
        name: &str,
        e: &BytesStart<'_>,
    ) -> Result<(), ParseError> {
        match name {
            "property-receivers" => {
                self.property_receivers = read_list(reader, "type")?
                    .iter()
                    .map(|(text, _)| TypeMatcher::parse(text))
                    .collect();
            }
            "extension-hosts" => {
                self.extension_hosts = read_list(reader, "type")?
                    .iter()
                    .map(|(text, _)| TypeMatcher::parse(text))
                    .collect();
            }
            "excluded-markers" => {
                self.excluded_markers = read_list(reader, "marker")?
                    .into_iter()
                    .map(|(marker, unless)| VerbExclusion { marker, unless })
                    .collect();
            }
            "excluded-names" => {
                self.excluded_names = read_list(reader, "name")?
                    .into_iter()
                    .map(|(name, _)| name)
                    .collect();
            }
            "preamble" => {
                self.preamble = read_list(reader, "using")?
                    .into_iter()
                    .map(|(using, _)| using)
                    .collect();
            }
            "extensions" => {
                self.apply_extensions_attrs(e)?;
                self.extensions_summary = read_list(reader, "summary")?
                    .into_iter()
                    .map(|(line, _)| line)
                    .collect();
            }
            "output" => {
                self.apply_output_attrs(e)?;
                skip_element(reader)?;
            }
            _ => {
                let text = read_text(reader)?;
                self.apply_scalar(name, &text)?;
            }
        }
        Ok(())
    }

    fn apply_empty(&mut self, name: &str, e: &BytesStart<'_>) -> Result<(), ParseError> {
        match name {
            "property-receivers" => self.property_receivers.clear(),
            "extension-hosts" => self.extension_hosts.clear(),
            "excluded-markers" => self.excluded_markers.clear(),
            "excluded-names" => self.excluded_names.clear(),
            "preamble" => self.preamble.clear(),
            "extensions" => {
                self.apply_extensions_attrs(e)?;
                self.extensions_summary.clear();
            }
            "output" => self.apply_output_attrs(e)?,
            _ => {}
        }
        Ok(())
    }

    fn apply_scalar(&mut self, name: &str, text: &str) -> Result<(), ParseError> {
        match name {
            "capability-receiver" => self.capability_receiver = text.to_string(),
            "optional-binder" => self.optional_binder = strip_arity(text).to_string(),
            "service-accessor" => self.service_accessor = text.to_string(),
            "payload-accessor" => self.payload_accessor = text.to_string(),
            "optional-property-mode" => {
                self.optional_property_mode = OptionalPropertyMode::parse(text).ok_or_else(
                    || ParseError::invalid_attr("optional-property-mode", "text", text),
                )?
            }
            "qualify-type-names" => {
                self.qualify_type_names = match text {
                    "true" => true,
                    "false" => false,
                    _ => return Err(ParseError::invalid_attr("qualify-type-names", "text", text)),
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn apply_extensions_attrs(&mut self, e: &BytesStart<'_>) -> Result<(), ParseError> {
        for (key, value) in attributes(e)? {
            match key.as_str() {
                "namespace" => self.extensions_namespace = value,
                "class" => self.extensions_class = value,
                _ => {}
            }
        }
        Ok(())
    }

    fn apply_output_attrs(&mut self, e: &BytesStart<'_>) -> Result<(), ParseError> {
        for (key, value) in attributes(e)? {
            match key.as_str() {
                "properties" => self.properties_file_name = value,
                "extensions" => self.extensions_file_name = value,
                _ => {}
            }
        }
        Ok(())
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self::io_fluently()
    }
}

/// Reads `<item unless="...">text</item>` children until the parent closes.
fn read_list(
    reader: &mut Reader<&[u8]>,
    item: &str,
) -> Result<Vec<(String, Option<String>)>, ParseError> {
    let mut items = Vec::new();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                if element_name(e)? == item {
                    let unless = attributes(e)?
                        .into_iter()
                        .find(|(key, _)| key == "unless")
                        .map(|(_, value)| value);
                    items.push((read_text(reader)?, unless));
                } else {
                    skip_element(reader)?;
                }
            }
            Ok(Event::End(_)) => break,
            Ok(Event::Eof) => {
                return Err(ParseError::structure(format!(
                    "unexpected end of document in list of <{item}>"
                )));
            }
            Err(e) => return Err(ParseError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(items)
}

/// Reads the text content of the current element up to its end tag.
fn read_text(reader: &mut Reader<&[u8]>) -> Result<String, ParseError> {
    let mut text = String::new();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Text(ref t)) => text.push_str(&t.decode().map_err(quick_xml::Error::from)?),
            Ok(Event::GeneralRef(ref r)) => {
                if let Some(ch) = r.resolve_char_ref()? {
                    text.push(ch);
                } else {
                    let name = r.decode().map_err(quick_xml::Error::from)?;
                    let resolved = resolve_predefined_entity(&name).ok_or_else(|| {
                        ParseError::structure(format!("unknown entity reference &{name};"))
                    })?;
                    text.push_str(resolved);
                }
            }
            Ok(Event::Start(_)) => skip_element(reader)?,
            Ok(Event::End(_)) | Ok(Event::Eof) => break,
            Err(e) => return Err(ParseError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(text.trim().to_string())
}

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

fn element_name(e: &BytesStart<'_>) -> Result<String, ParseError> {
    Ok(std::str::from_utf8(e.name().as_ref())?.to_string())
}

fn attributes(e: &BytesStart<'_>) -> Result<Vec<(String, String)>, ParseError> {
    let mut out = Vec::new();
    for attr in e.attributes().flatten() {
        let key = std::str::from_utf8(attr.key.as_ref())?;
        let value = attr.unescape_value()?;
        out.push((key.to_string(), value.into_owned()));
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_matcher_bare() {
        let matcher = TypeMatcher::parse("AbsolutePath");
        assert!(matcher.matches(&TypeIdentifier::new("IoFluently", "AbsolutePath")));
        assert!(matcher.matches(&TypeIdentifier::new("Other", "AbsolutePath")));
        assert!(!matcher.matches(&TypeIdentifier::new("IoFluently", "RelativePath")));
    }

    #[test]
    fn test_type_matcher_qualified() {
        let matcher = TypeMatcher::parse("IoFluently.Paths.AbsolutePath");
        assert_eq!(matcher.namespace.as_deref(), Some("IoFluently.Paths"));
        assert!(matcher.matches(&TypeIdentifier::new("IoFluently.Paths", "AbsolutePath")));
        assert!(!matcher.matches(&TypeIdentifier::new("IoFluently", "AbsolutePath")));
    }

    #[test]
    fn test_type_matcher_ignores_arity_marker() {
        let matcher = TypeMatcher::parse("IMaybe`1");
        assert!(matcher.matches(&TypeIdentifier::new("SimpleMonads", "IMaybe`1")));
    }

    #[test]
    fn test_verb_exclusion_with_exemption() {
        let rule = VerbExclusion::new("Read").unless("ReadOnly");
        assert!(rule.excludes("ReadText"));
        assert!(!rule.excludes("IsReadOnly"));
        assert!(!rule.excludes("Exists"));
    }

    #[test]
    fn test_io_fluently_profile() {
        let config = GeneratorConfig::default();
        assert_eq!(config.property_receivers.len(), 10);
        assert_eq!(config.extension_hosts.len(), 10);
        assert_eq!(config.excluded_markers.len(), 7);
        assert_eq!(config.excluded_names.len(), 4);
        assert_eq!(config.capability_receiver, "IHasAbsolutePath");
        assert_eq!(config.optional_property_mode, OptionalPropertyMode::Unwrap);
    }

    #[test]
    fn test_empty_profile() {
        let config = GeneratorConfig::empty().with_property_receivers(["Node"]);
        assert_eq!(config.property_receivers, vec![TypeMatcher::parse("Node")]);
        assert!(config.extension_hosts.is_empty());
        assert!(config.excluded_markers.is_empty());
    }

    #[test]
    fn test_from_xml_overrides() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<generator>
    <property-receivers>
        <type>Graph.Node</type>
    </property-receivers>
    <extension-hosts/>
    <excluded-markers>
        <marker>Remove</marker>
        <marker unless="ReadOnly">Read</marker>
    </excluded-markers>
    <capability-receiver>IHasNode</capability-receiver>
    <optional-binder>Option`1</optional-binder>
    <optional-property-mode>raw</optional-property-mode>
    <qualify-type-names>true</qualify-type-names>
    <preamble>
        <using>System</using>
    </preamble>
    <extensions namespace="Graph" class="NodeExtensions">
        <summary>Node shorthands.</summary>
    </extensions>
    <output properties="Nodes.g.cs" extensions="NodeExtensions.g.cs"/>
</generator>"#;

        let config = GeneratorConfig::from_xml(xml).expect("Failed to parse config");

        assert_eq!(config.property_receivers, vec![TypeMatcher::parse("Graph.Node")]);
        assert!(config.extension_hosts.is_empty());
        assert_eq!(
            config.excluded_markers,
            vec![
                VerbExclusion::new("Remove"),
                VerbExclusion::new("Read").unless("ReadOnly"),
            ]
        );
        assert_eq!(config.excluded_names.len(), 4);
        assert_eq!(config.capability_receiver, "IHasNode");
        assert_eq!(config.optional_binder, "Option");
        assert_eq!(config.optional_property_mode, OptionalPropertyMode::Raw);
        assert!(config.qualify_type_names);
        assert_eq!(config.preamble, vec!["System".to_string()]);
        assert_eq!(config.extensions_namespace, "Graph");
        assert_eq!(config.extensions_class, "NodeExtensions");
        assert_eq!(config.extensions_summary, vec!["Node shorthands.".to_string()]);
        assert_eq!(config.properties_file_name, "Nodes.g.cs");
        assert_eq!(config.extensions_file_name, "NodeExtensions.g.cs");
    }

    #[test]
    fn test_from_xml_decodes_references() {
        let xml = r#"<generator>
    <extensions namespace="Io &amp; Paths" class="PathExtensions">
        <summary>Reads &lt;see&gt; &amp; more &#169;</summary>
    </extensions>
    <excluded-markers>
        <marker unless="Read&amp;Only">Read</marker>
    </excluded-markers>
</generator>"#;

        let config = GeneratorConfig::from_xml(xml).expect("Failed to parse config");

        assert_eq!(config.extensions_namespace, "Io & Paths");
        assert_eq!(
            config.extensions_summary,
            vec!["Reads <see> & more \u{a9}".to_string()]
        );
        assert_eq!(
            config.excluded_markers,
            vec![VerbExclusion::new("Read").unless("Read&Only")]
        );
    }

    #[test]
    fn test_from_xml_unknown_entity() {
        let xml = "<generator><capability-receiver>&bogus;</capability-receiver></generator>";
        assert!(GeneratorConfig::from_xml(xml).is_err());
    }

    #[test]
    fn test_from_xml_invalid_mode() {
        let xml = "<generator><optional-property-mode>maybe</optional-property-mode></generator>";
        assert!(matches!(
            GeneratorConfig::from_xml(xml),
            Err(ParseError::InvalidAttribute { .. })
        ));
    }

    #[test]
    fn test_from_xml_requires_root() {
        assert!(GeneratorConfig::from_xml("<config/>").is_err());
    }
}
