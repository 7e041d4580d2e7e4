//! C# source emission.

pub mod extensions;
pub mod properties;
pub mod types;

pub use extensions::ExtensionGenerator;
pub use properties::PropertyGenerator;
pub use types::TypeRenderer;

const INDENT: &str = "    ";

/// Renders the `using` block that opens every generated file.
#[must_use]
pub fn preamble(namespaces: &[String]) -> String {
    let mut output = String::new();
    for namespace in namespaces {
        output.push_str(&format!("using {namespace};\n"));
    }
    if !namespaces.is_empty() {
        output.push('\n');
    }
    output
}

/// Opens an optional namespace block and returns the indentation to use
/// inside it.
fn open_namespace(output: &mut String, namespace: &str) -> &'static str {
    if namespace.is_empty() {
        ""
    } else {
        output.push_str(&format!("namespace {namespace}\n{{\n"));
        INDENT
    }
}

fn close_namespace(output: &mut String, namespace: &str) {
    if !namespace.is_empty() {
        output.push_str("}\n");
    }
}
