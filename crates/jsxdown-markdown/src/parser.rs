//! Markdown document parser.

use pulldown_cmark::{html, CodeBlockKind, Event, Options, Parser, Tag, TagEnd};
use serde::Serialize;

use crate::codeblock::{fence_language, CodeBlockRenderer, IdGenerator, RandomIds, SubComponent};
use crate::frontmatter::{extract_frontmatter, Attributes, FrontmatterError};
use crate::highlight::{
    HighlightError, PlainHighlighter, SyntaxHighlighter, SyntectHighlighter,
};

/// Hook for rendering code blocks. Every other construct keeps the
/// markdown engine's default HTML.
pub trait FenceHandler {
    /// Render a fenced or indented code block. `language` is empty when the
    /// fence has no info string. Custom handlers report their own failures
    /// as [`RenderError::Fence`].
    fn render_fence(&mut self, code: &str, language: &str) -> Result<String, RenderError>;
}

impl FenceHandler for CodeBlockRenderer<'_> {
    fn render_fence(&mut self, code: &str, language: &str) -> Result<String, RenderError> {
        Ok(self.render_block(code, language)?)
    }
}

/// Errors that can occur while rendering markdown.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("Highlight error: {0}")]
    Highlight(#[from] HighlightError),

    /// Failure reported by a custom [`FenceHandler`]. The built-in
    /// renderer never returns it; rendering stops and no partial HTML is
    /// produced.
    #[error("Code block handler failed: {0}")]
    Fence(String),
}

/// Errors that can occur when parsing a document.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Frontmatter error: {0}")]
    Frontmatter(#[from] FrontmatterError),

    #[error("Render error: {0}")]
    Render(#[from] RenderError),
}

/// Markdown body rendered to HTML.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedMarkdown {
    /// Rendered HTML
    pub html: String,

    /// Components lifted out of demo blocks, in document order
    pub components: Vec<SubComponent>,

    /// Whether any demo block was rendered
    pub has_code_template: bool,
}

/// A fully parsed document, ready to be built into a component.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParseResult {
    /// Rendered HTML
    pub html: String,

    /// Components lifted out of demo blocks, in document order
    pub components: Vec<SubComponent>,

    /// Whether any demo block was rendered
    pub has_code_template: bool,

    /// Front matter attributes, `imports` included
    pub attributes: Attributes,
}

/// Options for rendering markdown.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Highlight code blocks with syntect (escape only when false)
    pub highlight: bool,

    /// Grammar used for unknown languages (plain text when unset)
    pub fallback_language: Option<String>,

    /// Seed for generated component identifiers
    pub seed: Option<u64>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            highlight: true,
            fallback_language: None,
            seed: None,
        }
    }
}

/// Renders markdown documents with live code blocks.
pub struct MarkdownRenderer {
    highlighter: Box<dyn SyntaxHighlighter>,
    ids: Box<dyn IdGenerator>,
}

impl MarkdownRenderer {
    /// Create a renderer with default options.
    pub fn new() -> Self {
        Self::with_options(&RenderOptions::default())
    }

    /// Create a renderer from options.
    pub fn with_options(options: &RenderOptions) -> Self {
        let highlighter: Box<dyn SyntaxHighlighter> =
            match (options.highlight, &options.fallback_language) {
                (false, _) => Box::new(PlainHighlighter),
                (true, Some(fallback)) => {
                    Box::new(SyntectHighlighter::with_fallback(fallback.clone()))
                }
                (true, None) => Box::new(SyntectHighlighter::new()),
            };

        let ids = match options.seed {
            Some(seed) => RandomIds::seeded(seed),
            None => RandomIds::new(),
        };

        Self::with_parts(highlighter, Box::new(ids))
    }

    /// Create a renderer from a highlighter and an identifier generator.
    pub fn with_parts(highlighter: Box<dyn SyntaxHighlighter>, ids: Box<dyn IdGenerator>) -> Self {
        Self { highlighter, ids }
    }

    /// Render a markdown body.
    ///
    /// Each call starts with an empty component list.
    pub fn render(&mut self, body: &str) -> Result<RenderedMarkdown, RenderError> {
        let mut blocks = CodeBlockRenderer::new(self.highlighter.as_ref(), self.ids.as_mut());
        let html = render_html(body, &mut blocks)?;
        let (components, has_code_template) = blocks.finish();

        tracing::debug!(
            components = components.len(),
            has_code_template,
            "Rendered markdown"
        );

        Ok(RenderedMarkdown {
            html,
            components,
            has_code_template,
        })
    }

    /// Extract front matter and render the remaining markdown.
    pub fn parse(&mut self, source: &str) -> Result<ParseResult, ParseError> {
        let frontmatter = extract_frontmatter(source)?;
        let rendered = self.render(frontmatter.body)?;

        Ok(ParseResult {
            html: rendered.html,
            components: rendered.components,
            has_code_template: rendered.has_code_template,
            attributes: frontmatter.attributes,
        })
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse a document with default options.
pub fn parse(source: &str) -> Result<ParseResult, ParseError> {
    MarkdownRenderer::new().parse(source)
}

/// Render markdown to HTML, handing every code block to `handler`.
///
/// Output uses self-closing void elements. Nothing is returned if the
/// handler fails on any block.
pub fn render_html(body: &str, handler: &mut dyn FenceHandler) -> Result<String, RenderError> {
    let options = Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS;

    let mut events = Vec::new();
    let mut current_code_block: Option<(String, String)> = None; // (language, code)

    for event in Parser::new_ext(body, options) {
        match event {
            Event::Start(Tag::CodeBlock(kind)) => {
                let language = match &kind {
                    CodeBlockKind::Fenced(info) => fence_language(info).to_string(),
                    CodeBlockKind::Indented => String::new(),
                };
                current_code_block = Some((language, String::new()));
            }

            Event::Text(text) if current_code_block.is_some() => {
                if let Some((_, code)) = current_code_block.as_mut() {
                    code.push_str(&text);
                }
            }

            Event::End(TagEnd::CodeBlock) => {
                if let Some((language, code)) = current_code_block.take() {
                    let code = code.strip_suffix('\n').unwrap_or(&code);
                    let rendered = handler.render_fence(code, &language)?;
                    events.push(Event::Html(rendered.into()));
                }
            }

            other => events.push(other),
        }
    }

    let mut output = String::with_capacity(body.len() * 3 / 2);
    html::push_html(&mut output, events.into_iter());
    Ok(output)
}
