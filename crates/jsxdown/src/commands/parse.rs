//! Parse command: dumps the intermediate parse result as JSON.

use std::path::PathBuf;

use anyhow::{Context, Result};
use jsxdown_markdown::MarkdownRenderer;

use crate::config::ConfigFile;

/// Run the parse command.
pub async fn run(config: ConfigFile, input: PathBuf) -> Result<()> {
    let source = tokio::fs::read_to_string(&input)
        .await
        .with_context(|| format!("Failed to read {}", input.display()))?;

    let parsed = MarkdownRenderer::with_options(&config.render_options())
        .parse(&source)
        .with_context(|| format!("Failed to parse {}", input.display()))?;

    tracing::debug!(
        "Parsed {} ({} components)",
        input.display(),
        parsed.components.len()
    );

    println!("{}", serde_json::to_string_pretty(&parsed)?);
    Ok(())
}
