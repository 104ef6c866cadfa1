mod json;
mod yaml;

pub use json::to_json;
pub use yaml::to_yaml;

use crate::models::RunReport;

/// Report format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Yaml,
    Summary,
}

/// Format a RunReport according to the specified format
pub fn format_output(report: &RunReport, format: OutputFormat) -> Result<String, FormatError> {
    match format {
        OutputFormat::Json => to_json(report),
        OutputFormat::Yaml => to_yaml(report),
        OutputFormat::Summary => Ok(format_summary(report)),
    }
}

/// Generate a human-readable summary
pub fn format_summary(report: &RunReport) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "Documentation Summary\n\
         =====================\n\
         Root: {}\n\
         Repository: {}\n\
         Include: {}\n\
         Output: {}{}\n\n",
        report.root.display(),
        report.repository.base_url,
        report.include.join(", "),
        report.output_dir.display(),
        if report.metadata.dry_run { " (dry run)" } else { "" },
    ));

    output.push_str(&format!(
        "Files Found: {}\n\
         - Written: {}\n\
         - Failed: {}\n\n",
        report.stats.files_found, report.stats.files_written, report.stats.files_failed
    ));

    output.push_str(&format!(
        "Exported Units: {}\n\
         - Types: {}\n\
         - Functions: {}\n\n",
        report.stats.total_units, report.stats.type_units, report.stats.function_units
    ));

    if !report.failures.is_empty() {
        output.push_str("Failures:\n");
        for failure in &report.failures {
            output.push_str(&format!("  {}: {}\n", failure.source.display(), failure.error));
        }
        output.push('\n');
    }

    output.push_str(&format!(
        "Duration: {}ms ({:.2} files/sec)\n\
         Timestamp: {}\n\
         Tool Version: {}\n",
        report.metadata.duration_ms,
        report.metadata.files_per_second,
        report.metadata.timestamp,
        report.metadata.tool_version
    ));

    output
}

#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("YAML serialization error: {0}")]
    YamlError(#[from] serde_yaml::Error),
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::{FailedFile, GeneratedDoc, RepositoryContext, RunMetadata, RunStats};
    use std::path::PathBuf;

    pub(crate) fn sample_report() -> RunReport {
        let documents = vec![GeneratedDoc {
            source: PathBuf::from("src/math.ts"),
            output: PathBuf::from("docs/src/math.md"),
            units: 2,
            types: 1,
            functions: 1,
        }];
        let failures = vec![FailedFile {
            source: PathBuf::from("src/locked.ts"),
            error: "Failed to read src/locked.ts: permission denied".to_string(),
        }];
        let stats = RunStats::from_results(2, &documents, &failures);

        RunReport {
            root: PathBuf::from("/project"),
            output_dir: PathBuf::from("/project/docs"),
            repository: RepositoryContext::new("https://github.com/acme/widgets"),
            include: vec!["src/**/*".to_string()],
            documents,
            failures,
            stats,
            metadata: RunMetadata::default(),
        }
    }

    #[test]
    fn test_format_summary() {
        let summary = format_summary(&sample_report());
        assert!(summary.contains("Repository: https://github.com/acme/widgets"));
        assert!(summary.contains("- Written: 1"));
        assert!(summary.contains("- Failed: 1"));
        assert!(summary.contains("src/locked.ts: Failed to read"));
        assert!(!summary.contains("(dry run)"));
    }

    #[test]
    fn test_format_output_dispatch() {
        let report = sample_report();
        assert!(format_output(&report, OutputFormat::Json).unwrap().starts_with('{'));
        assert!(format_output(&report, OutputFormat::Summary)
            .unwrap()
            .starts_with("Documentation Summary"));
    }
}
