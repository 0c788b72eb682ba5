//! React component source generator.

use serde_json::{Map, Value};

use jsxdown_markdown::{rename_class_attributes, Attributes, ParseResult, IMPORTS_KEY};

use crate::casing::camelize_map;

/// Options controlling the emitted component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOptions {
    /// First import line of every component
    pub framework_import: String,

    /// Element wrapping the rendered document
    pub root_element: String,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            framework_import: "import React from 'react';".to_string(),
            root_element: "div".to_string(),
        }
    }
}

/// Errors that can occur while building a component.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("Failed to serialize attributes: {0}")]
    Attributes(#[from] serde_json::Error),
}

/// Build component source with the default options.
pub fn build_component(parsed: &ParseResult) -> Result<String, BuildError> {
    build_component_with(parsed, &BuildOptions::default())
}

/// Build the source of a React component rendering a parsed document.
///
/// The output holds, in order: the import block, the sub-component
/// definitions lifted out of demo blocks, an `attributes` export with the
/// camel-cased front matter (minus `imports`) and a default export rendering
/// the document HTML inside the root element.
pub fn build_component_with(
    parsed: &ParseResult,
    options: &BuildOptions,
) -> Result<String, BuildError> {
    let imports = import_block(&options.framework_import, &parsed.attributes);
    let components: String = parsed
        .components
        .iter()
        .map(|c| c.definition.as_str())
        .collect();
    let jsx = rename_class_attributes(&parsed.html);
    let attributes = serde_json::to_string(&exported_attributes(&parsed.attributes))?;

    Ok(format!(
        r#"
{imports}
{components}

export const attributes = {attributes};
export default () => (
  <{root}>
    {jsx}
  </{root}>
)"#,
        root = options.root_element,
    ))
}

/// Framework import followed by one `import <name> from '<path>';` line per
/// entry of the `imports` table, in declaration order.
fn import_block(framework_import: &str, attributes: &Attributes) -> String {
    let mut block = format!("{framework_import}\n");

    let imports = match attributes.get(IMPORTS_KEY) {
        None | Some(Value::Null) => return block,
        Some(Value::Object(imports)) => imports,
        Some(other) => {
            tracing::warn!(imports = %other, "Ignoring imports that are not a mapping");
            return block;
        }
    };

    for (name, path) in imports {
        let path = match path {
            Value::String(path) => path.clone(),
            other => {
                tracing::warn!(name = %name, path = %other, "Import path is not a string");
                other.to_string()
            }
        };
        block.push_str(&format!("import {name} from '{}';\n", escape_string(&path)));
    }

    block
}

/// Front matter without `imports`, keys camel-cased.
fn exported_attributes(attributes: &Attributes) -> Map<String, Value> {
    let exported: Map<String, Value> = attributes
        .iter()
        .filter(|(key, _)| key.as_str() != IMPORTS_KEY)
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();

    camelize_map(&exported)
}

/// Escape a string for a single-quoted JavaScript literal.
fn escape_string(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('\'', "\\'")
        .replace('\n', "\\n")
}
