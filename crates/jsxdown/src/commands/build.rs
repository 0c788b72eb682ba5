//! Component build command.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use rayon::prelude::*;
use walkdir::WalkDir;

use jsxdown_component::build_component_with;
use jsxdown_markdown::MarkdownRenderer;

use crate::config::ConfigFile;

/// Output directory for directory builds when none is given.
const DEFAULT_OUTPUT_DIR: &str = "dist";

/// A document compiled to component source.
#[derive(Debug)]
pub struct Compiled {
    /// Component source
    pub source: String,

    /// Number of components lifted out of demo blocks
    pub components: usize,

    /// Whether the document had a demo block
    pub has_code_template: bool,
}

/// Result of building a directory of documents.
#[derive(Debug, PartialEq)]
pub struct DirectoryBuild {
    /// Number of documents built
    pub documents: usize,

    /// Number of components lifted out of demo blocks
    pub components: usize,

    /// Number of documents containing demo blocks
    pub with_demos: usize,
}

/// Compile one markdown document.
pub fn compile(source: &str, config: &ConfigFile) -> Result<Compiled> {
    let parsed = MarkdownRenderer::with_options(&config.render_options()).parse(source)?;
    let component = build_component_with(&parsed, &config.build_options())?;

    Ok(Compiled {
        source: component,
        components: parsed.components.len(),
        has_code_template: parsed.has_code_template,
    })
}

/// Run the build command.
pub async fn run(config: ConfigFile, input: PathBuf, output: Option<PathBuf>) -> Result<()> {
    let start = Instant::now();

    if input.is_dir() {
        let output_dir = output.unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR));
        tracing::info!("Building {} into {}", input.display(), output_dir.display());

        let result = {
            let output_dir = output_dir.clone();
            tokio::task::spawn_blocking(move || build_directory(&input, &output_dir, &config))
                .await
                .context("Build task panicked")??
        };

        tracing::info!(
            "Built {} documents with {} components ({} with demos) in {}ms",
            result.documents,
            result.components,
            result.with_demos,
            start.elapsed().as_millis()
        );
        tracing::info!("Output: {}", output_dir.display());
        return Ok(());
    }

    let source = tokio::fs::read_to_string(&input)
        .await
        .with_context(|| format!("Failed to read {}", input.display()))?;
    let compiled =
        compile(&source, &config).with_context(|| format!("Failed to build {}", input.display()))?;

    match output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                tokio::fs::create_dir_all(parent)
                    .await
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
            tokio::fs::write(&path, &compiled.source)
                .await
                .with_context(|| format!("Failed to write {}", path.display()))?;
            tracing::info!(
                "Built {} with {} components in {}ms",
                path.display(),
                compiled.components,
                start.elapsed().as_millis()
            );
        }
        None => print!("{}", compiled.source),
    }

    Ok(())
}

/// Build every markdown document under `input_dir`, mirroring the tree
/// under `output_dir`.
pub fn build_directory(
    input_dir: &Path,
    output_dir: &Path,
    config: &ConfigFile,
) -> Result<DirectoryBuild> {
    let documents: Vec<PathBuf> = WalkDir::new(input_dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|path| is_markdown(path))
        .collect();

    let results: Vec<Result<Compiled>> = documents
        .par_iter()
        .map(|path| build_document(path, input_dir, output_dir, config))
        .collect();

    let mut build = DirectoryBuild {
        documents: 0,
        components: 0,
        with_demos: 0,
    };

    for result in results {
        let compiled = result?;
        build.documents += 1;
        build.components += compiled.components;
        build.with_demos += usize::from(compiled.has_code_template);
    }

    Ok(build)
}

fn build_document(
    path: &Path,
    input_dir: &Path,
    output_dir: &Path,
    config: &ConfigFile,
) -> Result<Compiled> {
    let source =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let compiled =
        compile(&source, config).with_context(|| format!("Failed to build {}", path.display()))?;

    let relative = path.strip_prefix(input_dir).unwrap_or(path);
    let output_path = output_dir
        .join(relative)
        .with_extension(&config.build.extension);

    if let Some(parent) = output_path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    fs::write(&output_path, &compiled.source)
        .with_context(|| format!("Failed to write {}", output_path.display()))?;

    tracing::debug!(
        "Built {} -> {} ({} components)",
        path.display(),
        output_path.display(),
        compiled.components
    );

    Ok(compiled)
}

fn is_markdown(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("md" | "markdown")
    )
}
