//! `selpick synth`: selector for the element a target selector points at.

use std::path::Path;

use anyhow::{Context, Result};
use selpick_config::SelpickConfig;
use selpick_synth::Synthesizer;
use tracing::info;

use crate::input::load_document;
use crate::terminal_output::note_error;

/// Prints the synthesized selector. Returns `false` when none exists.
pub async fn run(config: &SelpickConfig, html: &Path, target: &str) -> Result<bool> {
    let document = load_document(html).await?;
    let element = document
        .find_unique(target)
        .with_context(|| format!("--target must match exactly one element: `{target}`"))?;

    let synthesizer = Synthesizer::from_config(&config.synth())?;
    match synthesizer.synthesize(&document, element) {
        Some(selector) => {
            info!(%element, %selector, "Synthesized selector");
            println!("{}", config.copy_format().render(&selector));
            Ok(true)
        }
        None => {
            note_error("Could not generate a unique selector");
            Ok(false)
        }
    }
}
