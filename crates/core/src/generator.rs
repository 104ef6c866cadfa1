//! Collects the configured source files and writes one Markdown page per file.
//!
//! Files are documented independently on a rayon pool. Sources that would
//! write the same page are resolved up front: the first in order wins and the
//! rest are reported as failures.

use crate::config::{
    load_package_metadata, load_project_config, ConfigError, DocsConfig, IgnoreFilter, IncludeSet,
};
use crate::extractor::extract;
use crate::models::{
    FailedFile, GeneratedDoc, RepositoryContext, RunMetadata, RunReport, RunStats, UnitKind,
};
use crate::renderer::render_all;
use rayon::prelude::*;
use std::collections::HashMap;
use std::fs;
use std::path::{Component, Path, PathBuf};
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Extension of the generated documents
pub const DOC_EXTENSION: &str = "md";

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("Config error: {0}")]
    ConfigError(#[from] ConfigError),
    #[error("Thread pool error: {0}")]
    ThreadPoolError(String),
}

/// Failure while documenting a single file
#[derive(Error, Debug)]
pub enum FileError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A source file picked by the include patterns
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: PathBuf,
    /// Path relative to the project root, `/`-separated
    pub relative: String,
}

/// Generates one Markdown document per matched source file
pub struct DocGenerator {
    config: DocsConfig,
    repository: RepositoryContext,
    include: IncludeSet,
    ignore_filter: IgnoreFilter,
}

impl DocGenerator {
    /// Load project configuration and metadata. Any failure here is fatal.
    pub fn new(config: DocsConfig) -> Result<Self, GenerateError> {
        let manifest_path = config.resolve(&config.package_manifest);
        let repository = load_package_metadata(&manifest_path)?.repository(&manifest_path)?;

        let patterns = match config.include_override {
            Some(ref patterns) => patterns.clone(),
            None => {
                let config_path = config.resolve(&config.project_config);
                let project = load_project_config(&config_path)?;
                if project.include.is_empty() {
                    return Err(ConfigError::MissingInclude(config_path).into());
                }
                project.include
            }
        };

        Self::with_repository(config, repository, &patterns)
    }

    /// Build a generator without reading any project files
    pub fn with_repository(
        config: DocsConfig,
        repository: RepositoryContext,
        include: &[String],
    ) -> Result<Self, GenerateError> {
        let include = IncludeSet::new(include)?;
        let ignore_filter = IgnoreFilter::new(&config)?;
        Ok(Self {
            config,
            repository,
            include,
            ignore_filter,
        })
    }

    pub fn repository(&self) -> &RepositoryContext {
        &self.repository
    }

    pub fn include(&self) -> &IncludeSet {
        &self.include
    }

    /// Generate docs for every matched file
    pub fn generate(&self) -> Result<RunReport, GenerateError> {
        self.generate_with(&self.find_source_files(), |_| {})
    }

    /// Generate docs for `files`, calling `on_file` as each one settles.
    ///
    /// Files are independent: a failure is recorded in the report and never
    /// stops the others.
    pub fn generate_with<F>(&self, files: &[SourceFile], on_file: F) -> Result<RunReport, GenerateError>
    where
        F: Fn(&SourceFile) + Sync,
    {
        let start = Instant::now();

        info!(
            "Generating docs for {} hosted at {}",
            self.repository.name.as_deref().unwrap_or("<unnamed>"),
            self.repository.base_url
        );

        let process = |file: &SourceFile| {
            let result = self.process_file(file);
            on_file(file);
            result.map_err(|err| {
                warn!("Skipping {}: {}", file.relative, err);
                FailedFile {
                    source: PathBuf::from(&file.relative),
                    error: err.to_string(),
                }
            })
        };

        let (unique, collided) = self.partition_collisions(files);
        let mut failures = Vec::with_capacity(collided.len());
        for (file, failure) in collided {
            on_file(file);
            failures.push(failure);
        }

        let results: Vec<Result<GeneratedDoc, FailedFile>> = if self.config.threads == 1 {
            unique.iter().copied().map(process).collect()
        } else if self.config.threads > 0 {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(self.config.threads)
                .build()
                .map_err(|e| GenerateError::ThreadPoolError(e.to_string()))?;
            pool.install(|| unique.par_iter().copied().map(process).collect())
        } else {
            unique.par_iter().copied().map(process).collect()
        };

        let mut documents = Vec::with_capacity(results.len());
        for result in results {
            match result {
                Ok(doc) => documents.push(doc),
                Err(failure) => failures.push(failure),
            }
        }

        let stats = RunStats::from_results(files.len(), &documents, &failures);

        let duration = start.elapsed();
        let metadata = RunMetadata {
            duration_ms: duration.as_millis() as u64,
            files_per_second: if duration.as_secs_f64() > 0.0 {
                files.len() as f64 / duration.as_secs_f64()
            } else {
                files.len() as f64
            },
            timestamp: chrono::Utc::now().to_rfc3339(),
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
            dry_run: self.config.dry_run,
        };

        Ok(RunReport {
            root: self.config.root.clone(),
            output_dir: self.config.output_root(),
            repository: self.repository.clone(),
            include: self.include.patterns().to_vec(),
            documents,
            failures,
            stats,
            metadata,
        })
    }

    /// Split `files` into those with a page of their own and those whose page
    /// an earlier file already claims, e.g. `a.ts` after `a.js`.
    fn partition_collisions<'a>(
        &self,
        files: &'a [SourceFile],
    ) -> (Vec<&'a SourceFile>, Vec<(&'a SourceFile, FailedFile)>) {
        let output_root = self.config.output_root();
        let mut claimed: HashMap<PathBuf, &'a str> = HashMap::with_capacity(files.len());
        let mut unique = Vec::with_capacity(files.len());
        let mut collided = Vec::new();

        for file in files {
            let output = output_path_for(&output_root, Path::new(&file.relative));
            if let Some(owner) = claimed.get(&output).copied() {
                let error = format!("Output {} collides with {}", output.display(), owner);
                warn!("Skipping {}: {}", file.relative, error);
                collided.push((
                    file,
                    FailedFile {
                        source: PathBuf::from(&file.relative),
                        error,
                    },
                ));
                continue;
            }

            claimed.insert(output, file.relative.as_str());
            unique.push(file);
        }

        (unique, collided)
    }

    /// Find every file matching the include patterns, sorted by relative path
    pub fn find_source_files(&self) -> Vec<SourceFile> {
        info!("Looking for docs in {}...", self.include.patterns().join(", "));

        // Canonical paths so a relative root and an absolute output dir compare equal
        let root = fs::canonicalize(&self.config.root).unwrap_or_else(|_| self.config.root.clone());
        let output_root = self.config.output_root();
        let output_root = fs::canonicalize(&output_root).unwrap_or(output_root);
        let mut files = Vec::new();

        let walker = WalkDir::new(&root).into_iter().filter_entry(|e| {
            if e.depth() == 0 || !e.file_type().is_dir() {
                return true;
            }
            // Never document our own output
            if e.path() == output_root {
                return false;
            }
            let relative = e.path().strip_prefix(&root).unwrap_or(e.path());
            if self.ignore_filter.should_ignore(relative, true) {
                debug!("Skipping ignored directory {}", slash_path(relative));
                return false;
            }
            true
        });

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    warn!("Skipping unreadable entry: {}", err);
                    continue;
                }
            };

            if entry.file_type().is_dir() {
                continue;
            }

            let path = entry.path();
            let relative_path = path.strip_prefix(&root).unwrap_or(path);
            let relative = slash_path(relative_path);
            if !self.include.is_match(&relative) {
                continue;
            }

            if self.ignore_filter.should_ignore(relative_path, false) {
                debug!("Skipping ignored match {}", relative);
                continue;
            }

            debug!("Found {}", relative);
            files.push(SourceFile {
                path: path.to_path_buf(),
                relative,
            });
        }

        files.sort_by(|a, b| a.relative.cmp(&b.relative));
        files
    }

    /// Document a single file, writing its Markdown unless this is a dry run
    pub fn process_file(&self, file: &SourceFile) -> Result<GeneratedDoc, FileError> {
        let bytes = fs::read(&file.path).map_err(|source| FileError::Read {
            path: file.path.clone(),
            source,
        })?;
        let text = String::from_utf8_lossy(&bytes);

        let units = extract(&text);
        let doc = render_all(&self.repository.base_url, &file.relative, &units);
        let output = output_path_for(&self.config.output_root(), Path::new(&file.relative));

        if !self.config.dry_run {
            write_doc(&output, &doc)?;
        }

        let types = units.iter().filter(|u| u.kind() == UnitKind::Type).count();
        Ok(GeneratedDoc {
            source: PathBuf::from(&file.relative),
            output,
            units: units.len(),
            types,
            functions: units.len() - types,
        })
    }
}

/// Output path for a source file: same relative path under `output_root`,
/// extension replaced by `.md`
pub fn output_path_for(output_root: &Path, relative: &Path) -> PathBuf {
    output_root.join(relative).with_extension(DOC_EXTENSION)
}

/// Write a document, creating parent directories. Existing directories are fine,
/// including ones created concurrently by another file.
fn write_doc(output: &Path, doc: &str) -> Result<(), FileError> {
    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent).map_err(|source| FileError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    fs::write(output, doc).map_err(|source| FileError::Write {
        path: output.to_path_buf(),
        source,
    })
}

fn slash_path(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
