use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Kind of exported declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitKind {
    /// `export type Name = ...` block, terminated by a blank line
    Type,
    /// `export function name(...) {` header
    Function,
}

/// Zero-based, inclusive line range of a declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineSpan {
    pub start: usize,
    pub end: usize,
}

/// One exported declaration pulled out of a source file.
///
/// Units are built whole by the extractor and never change afterwards, so the
/// fields are only reachable through accessors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportedUnit {
    kind: UnitKind,
    signature_lines: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    doc_lines: Vec<String>,
    span: LineSpan,
}

impl ExportedUnit {
    pub(crate) fn new(
        kind: UnitKind,
        signature_lines: Vec<String>,
        doc_lines: Vec<String>,
        span: LineSpan,
    ) -> Self {
        debug_assert!(span.start <= span.end);
        Self {
            kind,
            signature_lines,
            doc_lines,
            span,
        }
    }

    pub fn kind(&self) -> UnitKind {
        self.kind
    }

    /// Raw declaration lines, header only for functions
    pub fn signature_lines(&self) -> &[String] {
        &self.signature_lines
    }

    /// Raw doc comment lines, comment markers included
    pub fn doc_lines(&self) -> &[String] {
        &self.doc_lines
    }

    pub fn span(&self) -> LineSpan {
        self.span
    }

    /// First signature line, used for title resolution
    pub fn first_line(&self) -> &str {
        self.signature_lines.first().map(String::as_str).unwrap_or("")
    }
}

/// Where the documented sources are hosted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryContext {
    /// Base URL for source links, without any `#fragment`
    pub base_url: String,
    /// Project name from package metadata
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl RepositoryContext {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            name: None,
        }
    }

    /// Build from a `homepage` URL, dropping everything from the first `#`
    pub fn from_homepage(homepage: &str, name: Option<String>) -> Self {
        let base_url = homepage.split('#').next().unwrap_or("").to_string();
        Self { base_url, name }
    }
}

/// A Markdown file produced for one source file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedDoc {
    /// Source path relative to the project root
    pub source: PathBuf,
    /// Path of the written Markdown file
    pub output: PathBuf,
    /// Number of exported units documented
    pub units: usize,
    pub types: usize,
    pub functions: usize,
}

/// A source file that could not be documented
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailedFile {
    pub source: PathBuf,
    pub error: String,
}

/// Aggregated results of one documentation run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// Project root path
    pub root: PathBuf,
    /// Directory the Markdown files were written to
    pub output_dir: PathBuf,
    /// Repository the links point at
    pub repository: RepositoryContext,
    /// Include patterns used to find sources
    pub include: Vec<String>,
    /// Documents written (or rendered, on a dry run)
    pub documents: Vec<GeneratedDoc>,
    /// Files skipped because of read/write errors
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<FailedFile>,
    /// Run statistics
    pub stats: RunStats,
    /// Run metadata
    pub metadata: RunMetadata,
}

impl RunReport {
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }
}

/// Statistics about a run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStats {
    pub files_found: usize,
    pub files_written: usize,
    pub files_failed: usize,
    pub total_units: usize,
    pub type_units: usize,
    pub function_units: usize,
}

impl RunStats {
    pub fn from_results(found: usize, documents: &[GeneratedDoc], failures: &[FailedFile]) -> Self {
        let mut stats = RunStats {
            files_found: found,
            files_written: documents.len(),
            files_failed: failures.len(),
            ..Default::default()
        };

        for doc in documents {
            stats.total_units += doc.units;
            stats.type_units += doc.types;
            stats.function_units += doc.functions;
        }

        stats
    }
}

/// Run metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunMetadata {
    pub duration_ms: u64,
    pub files_per_second: f64,
    pub timestamp: String,
    pub tool_version: String,
    #[serde(default)]
    pub dry_run: bool,
}

impl Default for RunMetadata {
    fn default() -> Self {
        Self {
            duration_ms: 0,
            files_per_second: 0.0,
            timestamp: chrono::Utc::now().to_rfc3339(),
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
            dry_run: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_homepage_fragment_is_stripped() {
        let repo = RepositoryContext::from_homepage(
            "https://github.com/acme/widgets#readme",
            Some("widgets".to_string()),
        );
        assert_eq!(repo.base_url, "https://github.com/acme/widgets");
        assert_eq!(repo.name.as_deref(), Some("widgets"));
    }

    #[test]
    fn test_homepage_without_fragment() {
        let repo = RepositoryContext::from_homepage("https://github.com/acme/widgets", None);
        assert_eq!(repo.base_url, "https://github.com/acme/widgets");
    }

    #[test]
    fn test_first_line_of_empty_unit() {
        let unit = ExportedUnit::new(
            UnitKind::Type,
            vec![],
            vec![],
            LineSpan { start: 0, end: 0 },
        );
        assert_eq!(unit.first_line(), "");
    }

    #[test]
    fn test_stats_from_results() {
        let docs = vec![
            GeneratedDoc {
                source: PathBuf::from("src/a.ts"),
                output: PathBuf::from("docs/src/a.md"),
                units: 3,
                types: 1,
                functions: 2,
            },
            GeneratedDoc {
                source: PathBuf::from("src/b.ts"),
                output: PathBuf::from("docs/src/b.md"),
                units: 1,
                types: 1,
                functions: 0,
            },
        ];
        let failures = vec![FailedFile {
            source: PathBuf::from("src/c.ts"),
            error: "denied".to_string(),
        }];

        let stats = RunStats::from_results(3, &docs, &failures);
        assert_eq!(stats.files_found, 3);
        assert_eq!(stats.files_written, 2);
        assert_eq!(stats.files_failed, 1);
        assert_eq!(stats.total_units, 4);
        assert_eq!(stats.type_units, 2);
        assert_eq!(stats.function_units, 2);
    }
}
