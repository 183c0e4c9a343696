//! Reading documents and layouts from disk.

use std::path::Path;

use anyhow::{Context, Result};
use selpick_dom::HtmlDocument;
use tokio::fs;

pub async fn load_document(path: &Path) -> Result<HtmlDocument> {
    let source = fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read HTML file: {}", path.display()))?;
    Ok(HtmlDocument::parse(&source))
}

/// Load a document and apply a layout sidecar for hit testing.
pub async fn load_document_with_layout(html: &Path, layout: &Path) -> Result<HtmlDocument> {
    let mut document = load_document(html).await?;
    let json = fs::read_to_string(layout)
        .await
        .with_context(|| format!("Failed to read layout file: {}", layout.display()))?;
    document
        .apply_layout_json(&json)
        .with_context(|| format!("Invalid layout in {}", layout.display()))?;
    Ok(document)
}
