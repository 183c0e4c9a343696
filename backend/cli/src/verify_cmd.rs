//! `selpick verify`: what a selector matches.

use std::path::Path;

use anyhow::Result;
use selpick_core::Document;

use crate::input::load_document;
use crate::terminal_output::{note_success, note_warn, render_table, Column};

/// Lists the matches. Returns `true` only when exactly one element matches.
pub async fn run(html: &Path, selector: &str) -> Result<bool> {
    let document = load_document(html).await?;
    let matches = document.query_all(selector)?;

    if !matches.is_empty() {
        let columns = [
            Column::right("#"),
            Column::left("Tag"),
            Column::left("Id"),
            Column::left("Classes").max_width(40),
        ];
        let rows: Vec<Vec<String>> = matches
            .iter()
            .map(|element| {
                vec![
                    element.0.to_string(),
                    document.tag_name(*element),
                    document.attribute(*element, "id").unwrap_or_default(),
                    document.classes(*element).join(" "),
                ]
            })
            .collect();
        print!("{}", render_table(&columns, &rows));
    }

    match matches.len() {
        1 => note_success(&format!("`{selector}` is unique")),
        0 => note_warn(&format!("`{selector}` matches nothing")),
        n => note_warn(&format!("`{selector}` matches {n} elements")),
    }
    Ok(matches.len() == 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn reports_uniqueness() {
        let dir = tempfile::tempdir().unwrap();
        let html = dir.path().join("page.html");
        std::fs::write(&html, r#"<p class="a">x</p><p class="a b">y</p>"#).unwrap();

        assert!(run(&html, "p.b").await.unwrap());
        assert!(!run(&html, "p.a").await.unwrap());
        assert!(!run(&html, "section").await.unwrap());
        assert!(run(&html, "p[").await.is_err());
    }
}
