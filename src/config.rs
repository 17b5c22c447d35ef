//! Configuration file support.
//!
//! A TOML file can supply the folder to organize, the default mode, the audit
//! log location, and rules for leaving some files where they are:
//!
//! ```toml
//! [organizer]
//! root = "/home/me/Downloads"
//! dry_run = true
//! log_file = "organizer.log"
//!
//! [filters]
//! enable_hidden_files = true
//!
//! [filters.exclude]
//! filenames = ["desktop.ini", "Thumbs.db"]
//! patterns = ["*.part"]
//! extensions = ["crdownload", "tmp"]
//! regex = []
//!
//! [filters.include]
//! patterns = []
//! ```

use crate::classifier::extension_of;
use glob::Pattern;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the per-directory configuration file.
pub const LOCAL_CONFIG_FILE: &str = ".typesortrc.toml";

/// Default audit log file, relative to the working directory.
pub const DEFAULT_LOG_FILE: &str = "organizer.log";

/// Errors that can occur during configuration loading and filter compilation.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// Configuration file not found at the specified path.
    #[error("Configuration file not found: {}", .0.display())]
    ConfigNotFound(PathBuf),
    /// Invalid TOML syntax or structure.
    #[error("Invalid configuration: {0}")]
    ConfigInvalid(String),
    /// Invalid glob pattern provided.
    #[error("Invalid glob pattern '{0}'")]
    InvalidGlobPattern(String),
    /// Invalid regex pattern provided.
    #[error("Invalid regex pattern '{pattern}': {reason}")]
    InvalidRegexPattern { pattern: String, reason: String },
    /// IO error while reading configuration.
    #[error("IO error reading configuration: {0}")]
    IoError(String),
}

/// Full configuration file contents.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrganizerConfig {
    #[serde(default)]
    pub organizer: OrganizerSettings,

    #[serde(default)]
    pub filters: FilterRules,

    /// File this configuration was read from, if any.
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

/// The `[organizer]` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrganizerSettings {
    /// Folder to organize when none is given on the command line.
    #[serde(default)]
    pub root: Option<PathBuf>,

    /// Simulate instead of moving files.
    #[serde(default)]
    pub dry_run: bool,

    /// Audit log location. Relative paths resolve against the working directory.
    #[serde(default = "default_log_file")]
    pub log_file: PathBuf,
}

fn default_log_file() -> PathBuf {
    PathBuf::from(DEFAULT_LOG_FILE)
}

impl Default for OrganizerSettings {
    fn default() -> Self {
        Self {
            root: None,
            dry_run: false,
            log_file: default_log_file(),
        }
    }
}

/// The `[filters]` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterRules {
    /// Whether names starting with "." are organized. Defaults to true.
    #[serde(default = "default_enable_hidden_files")]
    pub enable_hidden_files: bool,

    /// Rules for excluding files.
    #[serde(default)]
    pub exclude: ExcludeRules,

    /// Rules for including files (whitelist, overrides exclude rules).
    #[serde(default)]
    pub include: IncludeRules,
}

fn default_enable_hidden_files() -> bool {
    true
}

impl Default for FilterRules {
    fn default() -> Self {
        Self {
            enable_hidden_files: default_enable_hidden_files(),
            exclude: ExcludeRules::default(),
            include: IncludeRules::default(),
        }
    }
}

/// Rules for leaving files in place.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExcludeRules {
    /// Exact file names (e.g., "desktop.ini").
    #[serde(default)]
    pub filenames: Vec<String>,

    /// Glob patterns matched against the file name (e.g., "*.part").
    #[serde(default)]
    pub patterns: Vec<String>,

    /// Extensions without the dot, case-insensitive (e.g., "tmp").
    #[serde(default)]
    pub extensions: Vec<String>,

    /// Regex patterns matched against the file name.
    #[serde(default)]
    pub regex: Vec<String>,
}

/// Rules that override exclusion.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IncludeRules {
    /// Glob patterns matched against the file name.
    #[serde(default)]
    pub patterns: Vec<String>,
}

impl OrganizerConfig {
    /// Load configuration from a file, with fallback to defaults.
    ///
    /// Attempts to load configuration in the following order:
    /// 1. If `config_path` is provided, load from that file
    /// 2. Look for `.typesortrc.toml` in the current directory
    /// 3. Look for `~/.config/typesort/config.toml` in home directory
    /// 4. Fall back to default configuration
    ///
    /// # Errors
    ///
    /// Returns an error if a configuration file is explicitly provided but cannot be read,
    /// or if any discovered file is not valid.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = config_path {
            return Self::load_from_file(path);
        }

        let local_config = PathBuf::from(LOCAL_CONFIG_FILE);
        if local_config.exists() {
            return Self::load_from_file(&local_config);
        }

        if let Ok(home) = std::env::var("HOME") {
            let home_config = PathBuf::from(home)
                .join(".config")
                .join("typesort")
                .join("config.toml");
            if home_config.exists() {
                return Self::load_from_file(&home_config);
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::ConfigNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;
        let mut config: Self =
            toml::from_str(&content).map_err(|e| ConfigError::ConfigInvalid(e.to_string()))?;
        config.source = Some(path.to_path_buf());

        tracing::debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Compile the filter rules for matching.
    ///
    /// # Errors
    ///
    /// Returns an error if any regex or glob patterns are invalid.
    pub fn compile_filters(&self) -> Result<CompiledFilters, ConfigError> {
        CompiledFilters::new(&self.filters)
    }
}

/// Filter rules with every pattern compiled up front.
#[derive(Debug, Clone)]
pub struct CompiledFilters {
    enable_hidden_files: bool,
    exclude_filenames: HashSet<String>,
    exclude_extensions: HashSet<String>,
    exclude_patterns: Vec<Pattern>,
    exclude_regexes: Vec<Regex>,
    include_patterns: Vec<Pattern>,
}

impl Default for CompiledFilters {
    /// Filters that let every name through.
    fn default() -> Self {
        Self {
            enable_hidden_files: true,
            exclude_filenames: HashSet::new(),
            exclude_extensions: HashSet::new(),
            exclude_patterns: Vec::new(),
            exclude_regexes: Vec::new(),
            include_patterns: Vec::new(),
        }
    }
}

fn compile_globs(patterns: &[String]) -> Result<Vec<Pattern>, ConfigError> {
    patterns
        .iter()
        .map(|pattern| {
            Pattern::new(pattern).map_err(|_| ConfigError::InvalidGlobPattern(pattern.clone()))
        })
        .collect()
}

impl CompiledFilters {
    /// Create compiled filters from filter rules.
    pub fn new(rules: &FilterRules) -> Result<Self, ConfigError> {
        let exclude_regexes = rules
            .exclude
            .regex
            .iter()
            .map(|pattern| {
                Regex::new(pattern).map_err(|e| ConfigError::InvalidRegexPattern {
                    pattern: pattern.clone(),
                    reason: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            enable_hidden_files: rules.enable_hidden_files,
            exclude_filenames: rules.exclude.filenames.iter().cloned().collect(),
            exclude_extensions: rules
                .exclude
                .extensions
                .iter()
                .map(|ext| ext.trim_start_matches('.').to_lowercase())
                .collect(),
            exclude_patterns: compile_globs(&rules.exclude.patterns)?,
            exclude_regexes,
            include_patterns: compile_globs(&rules.include.patterns)?,
        })
    }

    /// Check if a file name should be organized.
    ///
    /// Checks are performed in this order, with early termination:
    /// 1. Include patterns (whitelist) - if matched, always include
    /// 2. Hidden file filter - if hidden and disabled, exclude
    /// 3. Exact filename match - if matched, exclude
    /// 4. File extension match - if matched, exclude
    /// 5. Glob pattern match - if matched, exclude
    /// 6. Regex pattern match - if matched, exclude
    /// 7. Default: include
    pub fn should_include(&self, file_name: &str) -> bool {
        if self.include_patterns.iter().any(|p| p.matches(file_name)) {
            return true;
        }

        if !self.enable_hidden_files && file_name.starts_with('.') {
            return false;
        }

        if self.exclude_filenames.contains(file_name) {
            return false;
        }

        if let Some(ext) = extension_of(file_name)
            && self.exclude_extensions.contains(&ext)
        {
            return false;
        }

        if self.exclude_patterns.iter().any(|p| p.matches(file_name)) {
            return false;
        }

        !self.exclude_regexes.iter().any(|r| r.is_match(file_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules_with_exclude(exclude: ExcludeRules) -> FilterRules {
        FilterRules {
            enable_hidden_files: true,
            exclude,
            include: IncludeRules::default(),
        }
    }

    #[test]
    fn test_default_config() {
        let config = OrganizerConfig::default();
        assert!(config.filters.enable_hidden_files);
        assert!(!config.organizer.dry_run);
        assert_eq!(config.organizer.root, None);
        assert_eq!(config.organizer.log_file, PathBuf::from(DEFAULT_LOG_FILE));
    }

    #[test]
    fn test_default_filters_include_everything() {
        let compiled = CompiledFilters::default();
        assert!(compiled.should_include(".bashrc"));
        assert!(compiled.should_include("README"));
        assert!(compiled.should_include("photo.JPG"));
    }

    #[test]
    fn test_parse_full_config() {
        let config: OrganizerConfig = toml::from_str(
            r#"
[organizer]
root = "/home/me/Downloads"
dry_run = true

[filters]
enable_hidden_files = false

[filters.exclude]
extensions = ["part"]
"#,
        )
        .expect("Failed to parse config");

        assert_eq!(
            config.organizer.root,
            Some(PathBuf::from("/home/me/Downloads"))
        );
        assert!(config.organizer.dry_run);
        assert_eq!(config.organizer.log_file, PathBuf::from(DEFAULT_LOG_FILE));
        assert!(!config.filters.enable_hidden_files);
        assert_eq!(config.filters.exclude.extensions, vec!["part".to_string()]);
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: OrganizerConfig = toml::from_str("").expect("Failed to parse config");
        assert!(config.filters.enable_hidden_files);
        assert!(!config.organizer.dry_run);
    }

    #[test]
    fn test_load_missing_explicit_file() {
        let result = OrganizerConfig::load(Some(Path::new("/non/existent/typesort.toml")));
        assert!(matches!(result, Err(ConfigError::ConfigNotFound(_))));
    }

    #[test]
    fn test_load_records_source() {
        let temp_dir = tempfile::TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "[organizer]\ndry_run = true\n").unwrap();

        let config = OrganizerConfig::load(Some(&path)).expect("Failed to load config");
        assert_eq!(config.source, Some(path));
        assert!(config.organizer.dry_run);
    }

    #[test]
    fn test_load_invalid_toml() {
        let temp_dir = tempfile::TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "[organizer\n").unwrap();

        let result = OrganizerConfig::load(Some(&path));
        assert!(matches!(result, Err(ConfigError::ConfigInvalid(_))));
    }

    #[test]
    fn test_hidden_file_excluded_when_disabled() {
        let rules = FilterRules {
            enable_hidden_files: false,
            ..FilterRules::default()
        };
        let compiled = CompiledFilters::new(&rules).unwrap();

        assert!(!compiled.should_include(".DS_Store"));
        assert!(compiled.should_include("photo.png"));
    }

    #[test]
    fn test_exclude_exact_filename() {
        let compiled = CompiledFilters::new(&rules_with_exclude(ExcludeRules {
            filenames: vec!["Thumbs.db".to_string(), "desktop.ini".to_string()],
            ..Default::default()
        }))
        .unwrap();

        assert!(!compiled.should_include("Thumbs.db"));
        assert!(compiled.should_include("image.jpg"));
    }

    #[test]
    fn test_exclude_extensions() {
        let compiled = CompiledFilters::new(&rules_with_exclude(ExcludeRules {
            extensions: vec!["bak".to_string(), ".tmp".to_string()],
            ..Default::default()
        }))
        .unwrap();

        assert!(!compiled.should_include("file.bak"));
        assert!(!compiled.should_include("file.tmp"));
        assert!(!compiled.should_include("file.BAK")); // Case-insensitive
        assert!(compiled.should_include("file.txt"));
        assert!(compiled.should_include("bak"));
    }

    #[test]
    fn test_exclude_glob_patterns() {
        let compiled = CompiledFilters::new(&rules_with_exclude(ExcludeRules {
            patterns: vec!["*.part".to_string(), "[0-9]*.tmp".to_string()],
            ..Default::default()
        }))
        .unwrap();

        assert!(!compiled.should_include("movie.mkv.part"));
        assert!(!compiled.should_include("1cache.tmp"));
        assert!(compiled.should_include("cache.tmp"));
        assert!(compiled.should_include("movie.mkv"));
    }

    #[test]
    fn test_glob_single_char_wildcard() {
        let compiled = CompiledFilters::new(&rules_with_exclude(ExcludeRules {
            patterns: vec!["file?.txt".to_string()],
            ..Default::default()
        }))
        .unwrap();

        assert!(!compiled.should_include("file1.txt"));
        assert!(compiled.should_include("file.txt"));
        assert!(compiled.should_include("file12.txt"));
    }

    #[test]
    fn test_include_overrides_exclude() {
        let rules = FilterRules {
            enable_hidden_files: false,
            exclude: ExcludeRules {
                extensions: vec!["log".to_string()],
                ..Default::default()
            },
            include: IncludeRules {
                patterns: vec![".important".to_string(), "keep-*.log".to_string()],
            },
        };
        let compiled = CompiledFilters::new(&rules).unwrap();

        assert!(compiled.should_include(".important"));
        assert!(!compiled.should_include(".other"));
        assert!(compiled.should_include("keep-me.log"));
        assert!(!compiled.should_include("debug.log"));
    }

    #[test]
    fn test_exclude_regex() {
        let compiled = CompiledFilters::new(&rules_with_exclude(ExcludeRules {
            regex: vec![r"^test_.*\.txt$".to_string()],
            ..Default::default()
        }))
        .unwrap();

        assert!(!compiled.should_include("test_file.txt"));
        assert!(compiled.should_include("file.txt"));
    }

    #[test]
    fn test_invalid_regex_returns_error() {
        let result = CompiledFilters::new(&rules_with_exclude(ExcludeRules {
            regex: vec!["[invalid(".to_string()],
            ..Default::default()
        }));
        assert!(matches!(
            result,
            Err(ConfigError::InvalidRegexPattern { .. })
        ));
    }

    #[test]
    fn test_invalid_glob_pattern_returns_error() {
        let result = CompiledFilters::new(&rules_with_exclude(ExcludeRules {
            patterns: vec!["[invalid".to_string()],
            ..Default::default()
        }));
        assert!(matches!(result, Err(ConfigError::InvalidGlobPattern(_))));
    }
}
