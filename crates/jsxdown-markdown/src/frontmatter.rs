//! Front matter extraction and parsing.

use serde_json::{Map, Value};

/// Metadata declared in a document's front matter, in declaration order.
pub type Attributes = Map<String, Value>;

/// Reserved front matter key holding the `identifier -> module path` import table.
pub const IMPORTS_KEY: &str = "imports";

const OPEN_DELIMITER: &str = "---";
const CLOSE_DELIMITERS: [&str; 2] = ["---", "..."];

/// A document split into its front matter and markdown body.
#[derive(Debug, Clone, PartialEq)]
pub struct Frontmatter<'a> {
    /// Parsed metadata (empty when the document has no front matter)
    pub attributes: Attributes,

    /// Markdown content following the front matter block
    pub body: &'a str,

    /// Line on which the body starts (1-indexed)
    pub body_line: usize,
}

impl<'a> Frontmatter<'a> {
    fn absent(source: &'a str) -> Self {
        Self {
            attributes: Attributes::new(),
            body: source,
            body_line: 1,
        }
    }
}

/// Extract front matter from a markdown document.
///
/// The block must start on the first line with `---` and is closed by a
/// line containing `---` or `...`. Documents without a closed block (for
/// example one opening with a thematic break) are returned untouched with
/// empty attributes. Only YAML that fails to parse inside a closed block is
/// an error.
pub fn extract_frontmatter(source: &str) -> Result<Frontmatter<'_>, FrontmatterError> {
    let content = source.strip_prefix('\u{feff}').unwrap_or(source);

    let mut lines = content.split_inclusive('\n');
    let Some(first) = lines.next() else {
        return Ok(Frontmatter::absent(source));
    };
    if first.trim_end() != OPEN_DELIMITER {
        return Ok(Frontmatter::absent(source));
    }

    let yaml_start = first.len();
    let mut offset = yaml_start;
    let mut line_number = 1;

    for line in lines {
        line_number += 1;

        if CLOSE_DELIMITERS.contains(&line.trim_end()) {
            let Some(attributes) = parse_attributes(&content[yaml_start..offset])? else {
                return Ok(Frontmatter::absent(source));
            };
            return Ok(Frontmatter {
                attributes,
                body: &content[offset + line.len()..],
                body_line: line_number + 1,
            });
        }

        offset += line.len();
    }

    Ok(Frontmatter::absent(source))
}

/// Parse the block contents. `None` when the YAML is not a mapping, in
/// which case the block is not front matter.
fn parse_attributes(yaml: &str) -> Result<Option<Attributes>, FrontmatterError> {
    if yaml.trim().is_empty() {
        return Ok(Some(Attributes::new()));
    }

    let value: Value =
        serde_yaml::from_str(yaml).map_err(|e| FrontmatterError::InvalidYaml(e.to_string()))?;

    match value {
        Value::Object(attributes) => Ok(Some(attributes)),
        Value::Null => Ok(Some(Attributes::new())),
        other => {
            tracing::debug!(kind = value_kind(&other), "Leading block is not a mapping");
            Ok(None)
        }
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "sequence",
        Value::Object(_) => "mapping",
    }
}

/// Errors that can occur when parsing front matter.
#[derive(Debug, thiserror::Error)]
pub enum FrontmatterError {
    #[error("Invalid YAML in frontmatter: {0}")]
    InvalidYaml(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn extracts_imports_and_body() {
        let source = "---\nimports:\n  Button: ./Button\n---\n# Hi";

        let fm = extract_frontmatter(source).unwrap();

        assert_eq!(
            Value::Object(fm.attributes),
            json!({ "imports": { "Button": "./Button" } })
        );
        assert_eq!(fm.body, "# Hi");
        assert_eq!(fm.body_line, 5);
    }

    #[test]
    fn handles_no_frontmatter() {
        let source = "# Just Markdown\n\nNo frontmatter here.";

        let fm = extract_frontmatter(source).unwrap();

        assert!(fm.attributes.is_empty());
        assert_eq!(fm.body, source);
        assert_eq!(fm.body_line, 1);
    }

    #[test]
    fn handles_empty_input() {
        let fm = extract_frontmatter("").unwrap();

        assert!(fm.attributes.is_empty());
        assert_eq!(fm.body, "");
    }

    #[test]
    fn accepts_empty_block_and_document_end_marker() {
        let fm = extract_frontmatter("---\n---\nbody").unwrap();
        assert!(fm.attributes.is_empty());
        assert_eq!(fm.body, "body");

        let fm = extract_frontmatter("---\ntitle: Cards\n...\nbody").unwrap();
        assert_eq!(fm.attributes["title"], json!("Cards"));
        assert_eq!(fm.body, "body");
    }

    #[test]
    fn skips_byte_order_mark() {
        let fm = extract_frontmatter("\u{feff}---\ntitle: Cards\n---\n# Cards\n").unwrap();

        assert_eq!(fm.attributes["title"], json!("Cards"));
        assert_eq!(fm.body, "# Cards\n");
    }

    #[test]
    fn keeps_declaration_order() {
        let fm = extract_frontmatter("---\nzeta: 1\nalpha: 2\nmid: 3\n---\n").unwrap();

        let keys: Vec<_> = fm.attributes.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn round_trips_scalar_metadata() {
        let attributes = json!({
            "title": "Button",
            "order": 3,
            "draft": false,
            "ratio": 1.5,
            "page-description": "A clickable button",
        });
        let body = "# Button\n\nSome *prose*.\n";

        let yaml = serde_yaml::to_string(&attributes).unwrap();
        let source = format!("---\n{yaml}---\n{body}");

        let fm = extract_frontmatter(&source).unwrap();

        assert_eq!(Value::Object(fm.attributes), attributes);
        assert_eq!(fm.body, body);
    }

    #[test]
    fn leading_thematic_break_is_body() {
        let source = "---\n# Title\n\nSome prose.\n";

        let fm = extract_frontmatter(source).unwrap();

        assert!(fm.attributes.is_empty());
        assert_eq!(fm.body, source);
        assert_eq!(fm.body_line, 1);
    }

    #[test]
    fn lone_delimiter_is_body() {
        let fm = extract_frontmatter("---").unwrap();

        assert!(fm.attributes.is_empty());
        assert_eq!(fm.body, "---");
    }

    #[test]
    fn errors_on_invalid_yaml() {
        let source = "---\ntitle: [invalid yaml\n---\n";

        let result = extract_frontmatter(source);

        assert!(matches!(result, Err(FrontmatterError::InvalidYaml(_))));
    }

    #[test]
    fn scalar_block_is_not_frontmatter() {
        let source = "---\njust a string\n---\n";

        let fm = extract_frontmatter(source).unwrap();

        assert!(fm.attributes.is_empty());
        assert_eq!(fm.body, source);
    }
}
