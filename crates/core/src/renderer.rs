//! Markdown rendering of exported units
//!
//! Each unit becomes a heading, a fenced signature, its raw doc comment and a
//! `[View source]` link to the unit's line range on the `main` branch. Nothing
//! is escaped; doc comments keep their `/** */` markers.

use crate::extractor::extract;
use crate::models::{ExportedUnit, RepositoryContext};
use crate::title::title;

pub const SOURCE_BRANCH: &str = "main";
pub const FENCE_LANGUAGE: &str = "javascript";

/// Render one unit as a Markdown fragment
pub fn render(repo_base_url: &str, file_path: &str, unit: &ExportedUnit) -> String {
    let headline = format!("## {}", title(unit));
    let signature = format!(
        "```{}\n{}\n```",
        FENCE_LANGUAGE,
        unit.signature_lines().join("\n")
    );
    let comments = unit.doc_lines().join("\n");
    let link = source_link(repo_base_url, file_path, unit);

    [headline, signature, comments, link].join("\n")
}

/// `[View source](<repo>/blob/main/<path>#L<start>-L<end>)` with zero-based lines
pub fn source_link(repo_base_url: &str, file_path: &str, unit: &ExportedUnit) -> String {
    let span = unit.span();
    format!(
        "[View source]({}/blob/{}/{}#L{}-L{})",
        repo_base_url, SOURCE_BRANCH, file_path, span.start, span.end
    )
}

/// Render every unit of a file, one fragment after another
pub fn render_all(repo_base_url: &str, file_path: &str, units: &[ExportedUnit]) -> String {
    units
        .iter()
        .map(|unit| render(repo_base_url, file_path, unit))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Extract and render a whole source text.
///
/// `relative_path` is the `/`-separated path used in source links.
pub fn document_source(repo: &RepositoryContext, relative_path: &str, text: &str) -> String {
    render_all(&repo.base_url, relative_path, &extract(text))
}
