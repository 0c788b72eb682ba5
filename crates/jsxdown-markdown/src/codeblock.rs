//! Code block classification and rendering.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use crate::highlight::{highlight, HighlightError, SyntaxHighlighter};

/// Fence tag for code that only runs.
pub const RUN_LANGUAGE: &str = "run";

/// Fence tag for a runnable example shown next to its source.
pub const DEMO_LANGUAGE: &str = "demo";

/// Grammar used to display the source of demo blocks.
const DEMO_SOURCE_LANGUAGE: &str = "jsx";

/// Substring identifying a class-based React component.
const COMPONENT_MARKER: &str = "React.Component";

const ID_PREFIX: char = 'B';
const ID_LENGTH: usize = 5;
const ID_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Rendering mode for a code block, chosen from its fence language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlockMode {
    /// Emit the code as live markup only
    Run,
    /// Live example paired with its highlighted source
    Demo,
    /// Syntax highlight only (default)
    #[default]
    Source,
}

impl BlockMode {
    /// Select the mode for a fence language.
    pub fn from_language(language: &str) -> Self {
        match language {
            RUN_LANGUAGE => Self::Run,
            DEMO_LANGUAGE => Self::Demo,
            _ => Self::Source,
        }
    }
}

/// Language of a fenced code block: the first word of its info string.
pub fn fence_language(info: &str) -> &str {
    info.split_whitespace().next().unwrap_or("")
}

/// Whether demo code defines a component rather than a piece of markup.
///
/// This is a substring check; code that merely mentions the marker is
/// treated as a component too.
pub fn is_component_definition(code: &str) -> bool {
    code.contains(COMPONENT_MARKER)
}

/// A component definition lifted out of a demo block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubComponent {
    /// Generated identifier the definition is bound to
    pub id: String,

    /// JavaScript statement binding the identifier (`const <id> = <code>`)
    pub definition: String,
}

impl SubComponent {
    /// Bind demo code to an identifier.
    pub fn new(id: String, code: &str) -> Self {
        let definition = format!("const {id} = {code}\n");
        Self { id, definition }
    }

    /// JSX element rendering this component.
    pub fn element(&self) -> String {
        format!("<{} />", self.id)
    }
}

/// Source of identifiers for generated sub-components.
pub trait IdGenerator: Send {
    /// Produce the next identifier. Must be a valid JSX component name.
    fn next_id(&mut self) -> String;
}

/// Random identifiers: `B` followed by five letters.
#[derive(Debug, Clone)]
pub struct RandomIds {
    rng: StdRng,
}

impl RandomIds {
    /// Create a generator seeded from the operating system.
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Create a generator producing a reproducible sequence.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomIds {
    fn default() -> Self {
        Self::new()
    }
}

impl IdGenerator for RandomIds {
    fn next_id(&mut self) -> String {
        let mut id = String::with_capacity(ID_LENGTH + 1);
        id.push(ID_PREFIX);

        for _ in 0..ID_LENGTH {
            let c = ID_ALPHABET[self.rng.random_range(0..ID_ALPHABET.len())];
            // Digits map to `A` so the id stays a plain identifier.
            id.push(if c.is_ascii_digit() { 'A' } else { c as char });
        }

        id
    }
}

/// Deterministic identifiers: `BAAAAA`, `BAAAAB`, ...
#[derive(Debug, Clone, Default)]
pub struct SequentialIds {
    next: u32,
}

impl SequentialIds {
    /// Create a generator starting at `BAAAAA`.
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&mut self) -> String {
        let mut suffix = [b'A'; ID_LENGTH];
        let mut n = self.next;
        for slot in suffix.iter_mut().rev() {
            *slot = b'A' + (n % 26) as u8;
            n /= 26;
        }
        self.next = self.next.wrapping_add(1);

        let mut id = String::with_capacity(ID_LENGTH + 1);
        id.push(ID_PREFIX);
        id.extend(suffix.iter().map(|&b| b as char));
        id
    }
}

/// Renders code blocks for one document, collecting the sub-components
/// lifted out of demo blocks along the way.
///
/// A renderer is created per render pass so components never leak from one
/// document into another.
pub struct CodeBlockRenderer<'a> {
    highlighter: &'a dyn SyntaxHighlighter,
    ids: &'a mut dyn IdGenerator,
    components: Vec<SubComponent>,
    has_code_template: bool,
}

impl<'a> CodeBlockRenderer<'a> {
    /// Create a renderer with an empty component list.
    pub fn new(highlighter: &'a dyn SyntaxHighlighter, ids: &'a mut dyn IdGenerator) -> Self {
        Self {
            highlighter,
            ids,
            components: Vec::new(),
            has_code_template: false,
        }
    }

    /// Render one code block according to its fence language.
    pub fn render_block(&mut self, code: &str, language: &str) -> Result<String, HighlightError> {
        match BlockMode::from_language(language) {
            BlockMode::Run => Ok(run_template(code, "code-just-run")),
            BlockMode::Demo => self.render_demo(code),
            BlockMode::Source => highlight(self.highlighter, code, language),
        }
    }

    fn render_demo(&mut self, code: &str) -> Result<String, HighlightError> {
        let run = if is_component_definition(code) {
            let component = SubComponent::new(self.ids.next_id(), code);
            let element = component.element();
            tracing::debug!(id = %component.id, "Registered demo component");
            self.components.push(component);
            element
        } else {
            run_template(code, "code-run")
        };

        let source = highlight(self.highlighter, code, DEMO_SOURCE_LANGUAGE)?;
        self.has_code_template = true;

        Ok(demo_template(&run, code, &source))
    }

    #[cfg(test)]
    fn components(&self) -> &[SubComponent] {
        &self.components
    }

    #[cfg(test)]
    fn has_code_template(&self) -> bool {
        self.has_code_template
    }

    /// Consume the renderer, returning the registered components and the demo flag.
    pub fn finish(self) -> (Vec<SubComponent>, bool) {
        (self.components, self.has_code_template)
    }
}

fn run_template(code: &str, class_name: &str) -> String {
    format!("\n      <div className=\"{class_name}\">\n        {code}\n      </div>")
}

fn demo_template(run: &str, code: &str, source: &str) -> String {
    format!(
        "\n      <div class=\"code-block\">\n        {run}\n\n        <div source='{code}'>\n          {source}\n        </div>\n      </div>"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highlight::PlainHighlighter;
    use pretty_assertions::assert_eq;

    const COMPONENT: &str = "class Hello extends React.Component {\n  render() { return <p>Hi</p>; }\n}";

    #[test]
    fn selects_mode_from_language() {
        assert_eq!(BlockMode::from_language("run"), BlockMode::Run);
        assert_eq!(BlockMode::from_language("demo"), BlockMode::Demo);
        assert_eq!(BlockMode::from_language("jsx"), BlockMode::Source);
        assert_eq!(BlockMode::from_language(""), BlockMode::Source);
        assert_eq!(BlockMode::from_language("Run"), BlockMode::Source);
    }

    #[test]
    fn takes_first_word_of_info_string() {
        assert_eq!(fence_language("demo title=\"Hello\""), "demo");
        assert_eq!(fence_language("  js  "), "js");
        assert_eq!(fence_language(""), "");
    }

    #[test]
    fn detects_component_marker() {
        assert!(is_component_definition(COMPONENT));
        assert!(!is_component_definition("<Button label=\"Go\" />"));
    }

    #[test]
    fn random_ids_are_letters_only() {
        let mut ids = RandomIds::seeded(7);

        for _ in 0..200 {
            let id = ids.next_id();
            assert_eq!(id.len(), 6);
            assert!(id.starts_with('B'));
            assert!(id.chars().all(|c| c.is_ascii_alphabetic()), "{id}");
        }
    }

    #[test]
    fn seeded_ids_are_reproducible() {
        let mut a = RandomIds::seeded(42);
        let mut b = RandomIds::seeded(42);

        assert_eq!(a.next_id(), b.next_id());
        assert_eq!(a.next_id(), b.next_id());
    }

    #[test]
    fn sequential_ids_count_up() {
        let mut ids = SequentialIds::new();

        assert_eq!(ids.next_id(), "BAAAAA");
        assert_eq!(ids.next_id(), "BAAAAB");
        for _ in 0..24 {
            ids.next_id();
        }
        assert_eq!(ids.next_id(), "BAAABA");
    }

    #[test]
    fn run_block_is_inlined_without_source() {
        let mut ids = SequentialIds::new();
        let mut renderer = CodeBlockRenderer::new(&PlainHighlighter, &mut ids);

        let html = renderer
            .render_block("<Button label=\"Go\" />", "run")
            .unwrap();

        assert_eq!(
            html,
            "\n      <div className=\"code-just-run\">\n        <Button label=\"Go\" />\n      </div>"
        );
        assert!(renderer.components().is_empty());
        assert!(!renderer.has_code_template());
    }

    #[test]
    fn run_block_never_registers_components() {
        let mut ids = SequentialIds::new();
        let mut renderer = CodeBlockRenderer::new(&PlainHighlighter, &mut ids);

        let html = renderer.render_block(COMPONENT, "run").unwrap();

        assert!(html.contains(COMPONENT));
        assert!(renderer.components().is_empty());
    }

    #[test]
    fn demo_component_is_registered_and_referenced() {
        let mut ids = SequentialIds::new();
        let mut renderer = CodeBlockRenderer::new(&PlainHighlighter, &mut ids);

        let html = renderer.render_block(COMPONENT, "demo").unwrap();

        assert_eq!(renderer.components().len(), 1);
        let component = &renderer.components()[0];
        assert_eq!(component.id, "BAAAAA");
        assert_eq!(component.definition, format!("const BAAAAA = {COMPONENT}\n"));

        assert!(html.starts_with("\n      <div class=\"code-block\">\n        <BAAAAA />\n"));
        assert!(html.contains(&format!("<div source='{COMPONENT}'>")));
        assert!(html.contains("<pre class=\"language-jsx\">"));
        assert!(renderer.has_code_template());
    }

    #[test]
    fn demo_markup_is_paired_without_registration() {
        let mut ids = SequentialIds::new();
        let mut renderer = CodeBlockRenderer::new(&PlainHighlighter, &mut ids);

        let html = renderer.render_block("<Button />", "demo").unwrap();

        assert_eq!(
            html,
            concat!(
                "\n      <div class=\"code-block\">",
                "\n        \n      <div className=\"code-run\">\n        <Button />\n      </div>",
                "\n\n        <div source='<Button />'>",
                "\n          \n<pre class=\"language-jsx\">\n  <code class=\"language-jsx\">\n    &lt;Button /&gt;\n  </code>\n</pre>\n  ",
                "\n        </div>\n      </div>",
            )
        );
        assert!(renderer.components().is_empty());
        assert!(renderer.has_code_template());
    }

    #[test]
    fn other_languages_are_only_highlighted() {
        let mut ids = SequentialIds::new();
        let mut renderer = CodeBlockRenderer::new(&PlainHighlighter, &mut ids);

        let html = renderer.render_block("let x = 1;", "js").unwrap();

        assert_eq!(
            html,
            highlight(&PlainHighlighter, "let x = 1;", "js").unwrap()
        );
        assert!(!html.contains("code-block"));
        assert!(renderer.components().is_empty());
        assert!(!renderer.has_code_template());
    }

    #[test]
    fn components_keep_document_order() {
        let mut ids = SequentialIds::new();
        let mut renderer = CodeBlockRenderer::new(&PlainHighlighter, &mut ids);

        renderer.render_block(COMPONENT, "demo").unwrap();
        renderer.render_block("<Button />", "demo").unwrap();
        renderer.render_block(COMPONENT, "demo").unwrap();

        let (components, has_code_template) = renderer.finish();
        let ids: Vec<_> = components.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["BAAAAA", "BAAAAB"]);
        assert!(has_code_template);
    }
}
