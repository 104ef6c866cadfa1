//! Configuration for a documentation run
//!
//! Reads the project configuration (`tsconfig.json`, for its `include`
//! patterns) and package metadata (`package.json`, for `homepage` and `name`),
//! and builds the include/ignore filters used to pick source files.

use crate::models::RepositoryContext;
use globset::{Glob, GlobBuilder, GlobMatcher, GlobSet, GlobSetBuilder};
use ignore::gitignore::{Gitignore, GitignoreBuilder};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: json5::Error,
    },
    #[error("No `homepage` in {0}")]
    MissingHomepage(PathBuf),
    #[error("No `include` patterns in {0}")]
    MissingInclude(PathBuf),
    #[error("Failed to build glob pattern: {0}")]
    GlobError(#[from] globset::Error),
    #[error("Failed to parse gitignore: {0}")]
    GitignoreError(#[from] ignore::Error),
}

/// Configuration for a documentation run
#[derive(Debug, Clone)]
pub struct DocsConfig {
    /// Project root; every other relative path is resolved against it
    pub root: PathBuf,
    /// Project configuration holding `include`
    pub project_config: PathBuf,
    /// Package metadata holding `homepage` and `name`
    pub package_manifest: PathBuf,
    /// Where Markdown files are written
    pub output_dir: PathBuf,
    /// Patterns to use instead of the project configuration's `include`
    pub include_override: Option<Vec<String>>,
    /// Additional ignore patterns (glob style)
    pub ignore_patterns: Vec<String>,
    /// Skip node_modules, .git and build output even when an include pattern matches
    pub skip_deps: bool,
    /// Skip files ignored by the root `.gitignore`
    pub respect_gitignore: bool,
    /// Number of threads (0 = auto, 1 = sequential)
    pub threads: usize,
    /// Render without writing any file
    pub dry_run: bool,
}

impl Default for DocsConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            project_config: PathBuf::from("tsconfig.json"),
            package_manifest: PathBuf::from("package.json"),
            output_dir: PathBuf::from("docs"),
            include_override: None,
            ignore_patterns: vec![],
            skip_deps: false,
            respect_gitignore: false,
            threads: 0,
            dry_run: false,
        }
    }
}

impl DocsConfig {
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            ..Default::default()
        }
    }

    pub fn with_project_config(mut self, path: PathBuf) -> Self {
        self.project_config = path;
        self
    }

    pub fn with_package_manifest(mut self, path: PathBuf) -> Self {
        self.package_manifest = path;
        self
    }

    pub fn with_output_dir(mut self, path: PathBuf) -> Self {
        self.output_dir = path;
        self
    }

    pub fn with_include(mut self, patterns: Vec<String>) -> Self {
        self.include_override = Some(patterns);
        self
    }

    pub fn with_ignore_patterns(mut self, patterns: Vec<String>) -> Self {
        self.ignore_patterns = patterns;
        self
    }

    pub fn with_skip_deps(mut self, skip: bool) -> Self {
        self.skip_deps = skip;
        self
    }

    pub fn with_respect_gitignore(mut self, respect: bool) -> Self {
        self.respect_gitignore = respect;
        self
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Resolve `path` against the project root unless it is absolute
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    pub fn output_root(&self) -> PathBuf {
        self.resolve(&self.output_dir)
    }
}

/// `include` accepts a single pattern or a list of them
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum Patterns {
    One(String),
    Many(Vec<String>),
}

impl From<Patterns> for Vec<String> {
    fn from(patterns: Patterns) -> Self {
        match patterns {
            Patterns::One(pattern) => vec![pattern],
            Patterns::Many(patterns) => patterns,
        }
    }
}

/// The parts of `tsconfig.json` the generator reads
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectConfig {
    #[serde(default, deserialize_with = "deserialize_patterns")]
    pub include: Vec<String>,
}

fn deserialize_patterns<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Patterns>::deserialize(deserializer)?
        .map(Vec::from)
        .unwrap_or_default())
}

/// The parts of `package.json` the generator reads
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PackageMetadata {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub homepage: Option<String>,
}

impl PackageMetadata {
    pub fn repository(&self, path: &Path) -> Result<RepositoryContext, ConfigError> {
        let homepage = self
            .homepage
            .as_deref()
            .ok_or_else(|| ConfigError::MissingHomepage(path.to_path_buf()))?;
        Ok(RepositoryContext::from_homepage(homepage, self.name.clone()))
    }
}

/// Read a JSON5 document (comments and trailing commas allowed)
fn read_json5<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T, ConfigError> {
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    json5::from_str(&text).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

pub fn load_project_config(path: &Path) -> Result<ProjectConfig, ConfigError> {
    read_json5(path)
}

pub fn load_package_metadata(path: &Path) -> Result<PackageMetadata, ConfigError> {
    read_json5(path)
}

/// Compiled `include` patterns, matched against `/`-separated relative paths.
///
/// `*` stays within one path segment and `**` spans directories. Wildcards do
/// not match dotfiles or dot-directories; a dot segment only matches a pattern
/// segment that itself starts with `.`.
#[derive(Debug, Clone)]
pub struct IncludeSet {
    patterns: Vec<String>,
    globs: GlobSet,
    /// Per pattern, the segments written with a leading `.`
    dot_segments: Vec<Vec<GlobMatcher>>,
}

impl IncludeSet {
    pub fn new(patterns: &[String]) -> Result<Self, ConfigError> {
        let mut builder = GlobSetBuilder::new();
        let mut normalized = Vec::with_capacity(patterns.len());
        let mut dot_segments = Vec::with_capacity(patterns.len());

        for pattern in patterns {
            let pattern = pattern.trim_start_matches("./").to_string();
            builder.add(GlobBuilder::new(&pattern).literal_separator(true).build()?);

            let dots = pattern
                .split('/')
                .filter(|segment| is_dot_segment(segment))
                .map(|segment| Glob::new(segment).map(|glob| glob.compile_matcher()))
                .collect::<Result<Vec<_>, globset::Error>>()?;
            dot_segments.push(dots);
            normalized.push(pattern);
        }

        Ok(Self {
            patterns: normalized,
            globs: builder.build()?,
            dot_segments,
        })
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    pub fn is_match(&self, relative_path: &str) -> bool {
        let hidden: Vec<&str> = relative_path
            .split('/')
            .filter(|segment| is_dot_segment(segment))
            .collect();

        self.globs.matches(relative_path).into_iter().any(|idx| {
            hidden.iter().all(|segment| {
                self.dot_segments[idx]
                    .iter()
                    .any(|matcher| matcher.is_match(segment))
            })
        })
    }
}

fn is_dot_segment(segment: &str) -> bool {
    segment.starts_with('.') && segment != "." && segment != ".."
}

/// Opt-in filter for skipping files the include patterns matched.
///
/// Extra `ignore_patterns` always apply. Dependency/build directories and the
/// root `.gitignore` are only consulted when enabled in [`DocsConfig`].
pub struct IgnoreFilter {
    gitignore: Option<Gitignore>,
    custom_globs: GlobSet,
    default_ignores: GlobSet,
}

impl IgnoreFilter {
    pub fn new(config: &DocsConfig) -> Result<Self, ConfigError> {
        let gitignore_path = config.root.join(".gitignore");
        let gitignore = if config.respect_gitignore && gitignore_path.exists() {
            let mut builder = GitignoreBuilder::new(&config.root);
            if let Some(err) = builder.add(&gitignore_path) {
                return Err(err.into());
            }
            Some(builder.build()?)
        } else {
            None
        };

        let mut custom_builder = GlobSetBuilder::new();
        for pattern in &config.ignore_patterns {
            custom_builder.add(Glob::new(pattern)?);
        }
        let custom_globs = custom_builder.build()?;

        let mut default_builder = GlobSetBuilder::new();
        if config.skip_deps {
            default_builder.add(Glob::new("**/node_modules/**")?);
            default_builder.add(Glob::new("**/.git/**")?);
            default_builder.add(Glob::new("**/dist/**")?);
            default_builder.add(Glob::new("**/build/**")?);
            default_builder.add(Glob::new("**/target/**")?);
        }
        let default_ignores = default_builder.build()?;

        Ok(Self {
            gitignore,
            custom_globs,
            default_ignores,
        })
    }

    /// Check if a path (relative to the project root) should be ignored
    pub fn should_ignore(&self, relative_path: &Path, is_dir: bool) -> bool {
        let path_str = relative_path.to_string_lossy();

        if self.default_ignores.is_match(&*path_str) {
            return true;
        }

        if self.custom_globs.is_match(&*path_str) {
            return true;
        }

        if let Some(ref gi) = self.gitignore {
            if gi.matched(relative_path, is_dir).is_ignore() {
                return true;
            }
        }

        false
    }
}
