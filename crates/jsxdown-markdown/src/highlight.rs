//! Syntax highlighting for code that ends up inside JSX.
//!
//! Highlighted markup is plain HTML, which JSX cannot take verbatim: braces
//! open expressions, raw newlines collapse, and `class` is spelled
//! `className`. [`highlight`] runs the engine and rewrites its output so the
//! fragment can be pasted into a component body as-is.

use std::sync::LazyLock;

use syntect::html::{ClassStyle, ClassedHTMLGenerator};
use syntect::parsing::{SyntaxReference, SyntaxSet};
use syntect::util::LinesWithEndings;

static SYNTAX_SET: LazyLock<SyntaxSet> = LazyLock::new(SyntaxSet::load_defaults_newlines);

/// A syntax highlighting engine producing HTML markup.
pub trait SyntaxHighlighter: Send + Sync {
    /// Highlight `code` with the grammar named by `language`.
    ///
    /// Unknown or empty languages must fall back to a default grammar
    /// instead of failing.
    fn highlight(&self, code: &str, language: &str) -> Result<String, HighlightError>;
}

/// Errors raised by a highlighting engine.
#[derive(Debug, thiserror::Error)]
pub enum HighlightError {
    #[error("Failed to highlight {language} code: {message}")]
    Engine { language: String, message: String },
}

/// Highlighter backed by syntect's bundled grammars.
#[derive(Debug, Clone, Default)]
pub struct SyntectHighlighter {
    /// Grammar used when the requested language is unknown (plain text when unset)
    fallback: Option<String>,
}

impl SyntectHighlighter {
    /// Create a highlighter falling back to plain text.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a highlighter falling back to the given grammar.
    pub fn with_fallback(language: impl Into<String>) -> Self {
        Self {
            fallback: Some(language.into()),
        }
    }

    fn find_syntax(&self, language: &str) -> &'static SyntaxReference {
        let syntaxes = &*SYNTAX_SET;

        if let Some(syntax) = lookup_syntax(syntaxes, language) {
            return syntax;
        }

        let fallback = self
            .fallback
            .as_deref()
            .and_then(|lang| lookup_syntax(syntaxes, lang))
            .unwrap_or_else(|| syntaxes.find_syntax_plain_text());

        tracing::debug!(
            language,
            fallback = %fallback.name,
            "No grammar for code block language"
        );
        fallback
    }
}

impl SyntaxHighlighter for SyntectHighlighter {
    fn highlight(&self, code: &str, language: &str) -> Result<String, HighlightError> {
        let syntax = self.find_syntax(language);
        let mut generator =
            ClassedHTMLGenerator::new_with_class_style(syntax, &SYNTAX_SET, ClassStyle::Spaced);

        for line in LinesWithEndings::from(code) {
            generator
                .parse_html_for_line_which_includes_newline(line)
                .map_err(|e| HighlightError::Engine {
                    language: language.to_string(),
                    message: e.to_string(),
                })?;
        }

        Ok(generator.finalize())
    }
}

/// Highlighter that only HTML-escapes the code.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainHighlighter;

impl SyntaxHighlighter for PlainHighlighter {
    fn highlight(&self, code: &str, _language: &str) -> Result<String, HighlightError> {
        Ok(html_escape::encode_text(code).into_owned())
    }
}

/// Map common fence tags onto grammars bundled with syntect.
fn lookup_syntax<'a>(syntaxes: &'a SyntaxSet, language: &str) -> Option<&'a SyntaxReference> {
    if language.is_empty() {
        return None;
    }

    let lower = language.to_lowercase();
    let token = match lower.as_str() {
        "jsx" | "mjs" | "cjs" | "ts" | "tsx" | "typescript" => "js",
        "sh" | "shell" | "zsh" => "bash",
        "yml" => "yaml",
        other => other,
    };

    syntaxes.find_syntax_by_token(token)
}

/// Highlight a code fragment and wrap it in `<pre>`/`<code>` tags ready for JSX.
pub fn highlight(
    highlighter: &dyn SyntaxHighlighter,
    code: &str,
    language: &str,
) -> Result<String, HighlightError> {
    let highlighted = highlighter.highlight(code, language)?;
    Ok(wrap_code(&escape_for_jsx(&highlighted), language))
}

/// Escape highlighted markup for embedding in JSX.
///
/// Braces become string expressions (`{"{"}`, `{"}"}`), newlines become
/// `{"\n"}` and `class=` attributes are renamed to `className=`.
pub fn escape_for_jsx(markup: &str) -> String {
    let mut escaped = String::with_capacity(markup.len() + markup.len() / 8);

    for c in markup.chars() {
        match c {
            '{' => escaped.push_str(r#"{"{"}"#),
            '}' => escaped.push_str(r#"{"}"}"#),
            '\n' => escaped.push_str(r#"{"\n"}"#),
            _ => escaped.push(c),
        }
    }

    rename_class_attributes(&escaped)
}

/// Rename every HTML `class=` attribute to the JSX `className=` spelling.
pub fn rename_class_attributes(markup: &str) -> String {
    markup.replace("class=", "className=")
}

fn wrap_code(highlighted: &str, language: &str) -> String {
    let class = if language.is_empty() {
        String::new()
    } else {
        format!(
            " class=\"language-{}\"",
            html_escape::encode_double_quoted_attribute(language)
        )
    };

    format!("\n<pre{class}>\n  <code{class}>\n    {highlighted}\n  </code>\n</pre>\n  ")
}
