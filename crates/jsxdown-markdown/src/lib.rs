//! Markdown to JSX-ready HTML with front matter and live code blocks.
//!
//! This crate extracts YAML front matter, renders the markdown body with
//! pulldown-cmark and turns code fences into highlighted source, runnable
//! markup (`run`) or paired live demos (`demo`). Class components found in
//! demo blocks are lifted out as named sub-components.

pub mod codeblock;
pub mod frontmatter;
pub mod highlight;
pub mod parser;

pub use codeblock::{
    is_component_definition, BlockMode, CodeBlockRenderer, IdGenerator, RandomIds, SequentialIds,
    SubComponent,
};
pub use frontmatter::{extract_frontmatter, Attributes, Frontmatter, FrontmatterError, IMPORTS_KEY};
pub use highlight::{
    highlight, rename_class_attributes, HighlightError, PlainHighlighter, SyntaxHighlighter,
    SyntectHighlighter,
};
pub use parser::{
    parse, render_html, FenceHandler, MarkdownRenderer, ParseError, ParseResult, RenderError,
    RenderOptions, RenderedMarkdown,
};
