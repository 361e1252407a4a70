//! Template materializer
//!
//! The template files are compiled into the binary. Materializing writes all
//! of them concurrently and joins every write before reporting, so the stage
//! never completes while a copy is still in flight.

use futures::future::join_all;
use std::path::PathBuf;
use tracing::{debug, info};

use crate::engine::StageKind;
use crate::io::paths::AppLayout;
use crate::{Result, ScaffoldError};

/// Stylesheet written verbatim to `src/index.css`
pub const STYLESHEET: &str = include_str!("../../templates/index.css");

/// Where a template lands inside the generated app
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    /// App root
    Root,
    /// `src/`
    Src,
    /// `src/tests/`
    Tests,
}

/// A bundled file and its path relative to its destination directory
#[derive(Debug, Clone, Copy)]
pub struct TemplateFile {
    pub name: &'static str,
    pub destination: Destination,
    pub contents: &'static str,
}

impl TemplateFile {
    const fn new(name: &'static str, destination: Destination, contents: &'static str) -> Self {
        Self {
            name,
            destination,
            contents,
        }
    }

    pub fn target(&self, layout: &AppLayout) -> PathBuf {
        let base = match self.destination {
            Destination::Root => layout.root.clone(),
            Destination::Src => layout.src_dir(),
            Destination::Tests => layout.tests_dir(),
        };
        base.join(self.name)
    }
}

/// Top-level config and doc files, in copy order
pub const TOP_LEVEL_FILES: &[TemplateFile] = &[
    TemplateFile::new("README.md", Destination::Root, include_str!("../../templates/README.md")),
    TemplateFile::new(
        "webpack.config.js",
        Destination::Root,
        include_str!("../../templates/webpack.config.js"),
    ),
    TemplateFile::new(".eslintrc", Destination::Root, include_str!("../../templates/.eslintrc")),
    TemplateFile::new(".babelrc", Destination::Root, include_str!("../../templates/.babelrc")),
];

/// Source-tree files, in copy order
pub const SRC_FILES: &[TemplateFile] = &[
    TemplateFile::new("index.js", Destination::Src, include_str!("../../templates/index.js")),
    TemplateFile::new("App.jsx", Destination::Src, include_str!("../../templates/App.jsx")),
    TemplateFile::new("index.html", Destination::Src, include_str!("../../templates/index.html")),
    TemplateFile::new(
        "registerServiceWorker.js",
        Destination::Src,
        include_str!("../../templates/registerServiceWorker.js"),
    ),
    TemplateFile::new("index.css", Destination::Src, STYLESHEET),
];

/// Jest support files referenced by the patched manifest
pub const TEST_SUPPORT_FILES: &[TemplateFile] = &[
    TemplateFile::new("setup.js", Destination::Tests, include_str!("../../templates/tests/setup.js")),
    TemplateFile::new(
        "__mock__/fileTransformer.js",
        Destination::Tests,
        include_str!("../../templates/tests/__mock__/fileTransformer.js"),
    ),
];

/// Every file the materializer writes
pub fn catalog() -> impl Iterator<Item = &'static TemplateFile> {
    TOP_LEVEL_FILES
        .iter()
        .chain(SRC_FILES.iter())
        .chain(TEST_SUPPORT_FILES.iter())
}

async fn write_template(layout: &AppLayout, template: &TemplateFile) -> std::io::Result<PathBuf> {
    let target = template.target(layout);
    if let Some(parent) = target.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(&target, template.contents).await?;
    debug!("Wrote template {:?}", target);
    Ok(target)
}

/// Write every template into the app; fails if any single write failed
pub async fn materialize(layout: &AppLayout) -> Result<Vec<PathBuf>> {
    let templates: Vec<&TemplateFile> = catalog().collect();
    info!("Writing {} template files into {:?}", templates.len(), layout.root);

    let results = join_all(templates.iter().map(|t| write_template(layout, t))).await;

    let mut written = Vec::with_capacity(results.len());
    let mut failures = Vec::new();
    for (template, result) in templates.iter().zip(results) {
        match result {
            Ok(path) => written.push(path),
            Err(e) => failures.push(format!(
                "failed to write {}: {}",
                template.target(layout).display(),
                e
            )),
        }
    }

    if !failures.is_empty() {
        return Err(ScaffoldError::Stage {
            stage: StageKind::Files.name().to_string(),
            reason: failures.join("; "),
        });
    }

    Ok(written)
}
