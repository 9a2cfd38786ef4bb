//! Extractor settings.
//!
//! Loads and merges:
//! - System defaults: `<PRJ_ROOT>/packages/conf/stream-edit.yaml`
//! - User overrides:  `<PRJ_CONFIG_HOME>/omni-dev-fusion/stream-edit.yaml`
//!
//! Merge precedence is user over system, field by field. Missing or broken
//! files are logged and ignored.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ExtractError;

const DEFAULT_SYSTEM_SETTINGS_RELATIVE_PATH: &str = "packages/conf/stream-edit.yaml";
const DEFAULT_USER_SETTINGS_RELATIVE_PATH: &str = "omni-dev-fusion/stream-edit.yaml";
const DEFAULT_CONFIG_HOME_RELATIVE_PATH: &str = ".config";

/// Fallback sentence shown when a turn's prose is degenerate.
pub const DEFAULT_CLEAN_RESPONSE_FALLBACK: &str = "I've prepared the requested code changes.";

/// Sentinel file path for edits whose file cannot be determined.
pub const UNKNOWN_FILE_PATH: &str = "unknown";

/// Resolved settings used by a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorSettings {
    /// Bytes of prose scanned before a marker or fence.
    pub context_window: usize,
    /// Bytes after a replace marker in which a fence must open.
    pub malformed_lookahead: usize,
    /// Characters of the code snippet used in keys and signatures.
    pub snippet_key_prefix: usize,
    /// Characters of the new code used in content signatures.
    pub signature_new_code_prefix: usize,
    /// Minimum length of a usable clean response.
    pub min_clean_response_len: usize,
    /// Sentence returned for degenerate clean responses.
    pub clean_response_fallback: String,
    /// Sentinel file path.
    pub unknown_file_path: String,
    /// Cap on harvested descriptions, in characters.
    pub max_description_len: usize,
}

impl Default for ExtractorSettings {
    fn default() -> Self {
        Self {
            context_window: 500,
            malformed_lookahead: 200,
            snippet_key_prefix: 50,
            signature_new_code_prefix: 100,
            min_clean_response_len: 20,
            clean_response_fallback: DEFAULT_CLEAN_RESPONSE_FALLBACK.to_string(),
            unknown_file_path: UNKNOWN_FILE_PATH.to_string(),
            max_description_len: 200,
        }
    }
}

impl ExtractorSettings {
    /// Parse a complete settings document; absent fields keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is invalid or a value is unusable.
    pub fn from_yaml_str(raw: &str) -> Result<Self, ExtractError> {
        let file: SettingsFile = serde_yaml::from_str(raw)?;
        file.resolve()
    }

    /// Check that every window and prefix is usable.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::Settings`] naming the first zero-sized field.
    pub fn validate(&self) -> Result<(), ExtractError> {
        let sizes = [
            ("context_window", self.context_window),
            ("malformed_lookahead", self.malformed_lookahead),
            ("snippet_key_prefix", self.snippet_key_prefix),
            ("signature_new_code_prefix", self.signature_new_code_prefix),
            ("max_description_len", self.max_description_len),
        ];
        if let Some((field, _)) = sizes.iter().find(|(_, value)| *value == 0) {
            return Err(ExtractError::Settings(format!("`{field}` must be greater than zero")));
        }
        if self.unknown_file_path.trim().is_empty() {
            return Err(ExtractError::Settings(
                "`unknown_file_path` must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// One settings file as written on disk; every field is optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SettingsFile {
    /// See [`ExtractorSettings::context_window`].
    pub context_window: Option<usize>,
    /// See [`ExtractorSettings::malformed_lookahead`].
    pub malformed_lookahead: Option<usize>,
    /// See [`ExtractorSettings::snippet_key_prefix`].
    pub snippet_key_prefix: Option<usize>,
    /// See [`ExtractorSettings::signature_new_code_prefix`].
    pub signature_new_code_prefix: Option<usize>,
    /// See [`ExtractorSettings::min_clean_response_len`].
    pub min_clean_response_len: Option<usize>,
    /// See [`ExtractorSettings::clean_response_fallback`].
    pub clean_response_fallback: Option<String>,
    /// See [`ExtractorSettings::unknown_file_path`].
    pub unknown_file_path: Option<String>,
    /// See [`ExtractorSettings::max_description_len`].
    pub max_description_len: Option<usize>,
}

impl SettingsFile {
    /// Overlay `overlay` on top of `self`.
    #[must_use]
    pub fn merge(self, overlay: Self) -> Self {
        Self {
            context_window: overlay.context_window.or(self.context_window),
            malformed_lookahead: overlay.malformed_lookahead.or(self.malformed_lookahead),
            snippet_key_prefix: overlay.snippet_key_prefix.or(self.snippet_key_prefix),
            signature_new_code_prefix: overlay
                .signature_new_code_prefix
                .or(self.signature_new_code_prefix),
            min_clean_response_len: overlay
                .min_clean_response_len
                .or(self.min_clean_response_len),
            clean_response_fallback: overlay
                .clean_response_fallback
                .or(self.clean_response_fallback),
            unknown_file_path: overlay.unknown_file_path.or(self.unknown_file_path),
            max_description_len: overlay.max_description_len.or(self.max_description_len),
        }
    }

    /// Fill gaps with defaults and validate.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::Settings`] when a value is unusable.
    pub fn resolve(self) -> Result<ExtractorSettings, ExtractError> {
        let defaults = ExtractorSettings::default();
        let settings = ExtractorSettings {
            context_window: self.context_window.unwrap_or(defaults.context_window),
            malformed_lookahead: self
                .malformed_lookahead
                .unwrap_or(defaults.malformed_lookahead),
            snippet_key_prefix: self.snippet_key_prefix.unwrap_or(defaults.snippet_key_prefix),
            signature_new_code_prefix: self
                .signature_new_code_prefix
                .unwrap_or(defaults.signature_new_code_prefix),
            min_clean_response_len: self
                .min_clean_response_len
                .unwrap_or(defaults.min_clean_response_len),
            clean_response_fallback: self
                .clean_response_fallback
                .unwrap_or(defaults.clean_response_fallback),
            unknown_file_path: self.unknown_file_path.unwrap_or(defaults.unknown_file_path),
            max_description_len: self
                .max_description_len
                .unwrap_or(defaults.max_description_len),
        };
        settings.validate()?;
        Ok(settings)
    }
}

/// Load settings from the default system and user locations.
#[must_use]
pub fn load_settings() -> ExtractorSettings {
    let (system_path, user_path) = settings_paths();
    load_settings_from_paths(&system_path, &user_path)
}

/// Default system and user settings paths.
#[must_use]
pub fn settings_paths() -> (PathBuf, PathBuf) {
    let root = project_root();
    let system_path = root.join(DEFAULT_SYSTEM_SETTINGS_RELATIVE_PATH);
    let user_path = resolve_config_home(&root).join(DEFAULT_USER_SETTINGS_RELATIVE_PATH);
    (system_path, user_path)
}

/// Load and merge two settings files; user values win.
///
/// Unusable merged values are logged and replaced by the defaults.
#[must_use]
pub fn load_settings_from_paths(system: &Path, user: &Path) -> ExtractorSettings {
    match load_one(system).merge(load_one(user)).resolve() {
        Ok(settings) => settings,
        Err(error) => {
            tracing::warn!(error = %error, "invalid stream-edit settings; using defaults");
            ExtractorSettings::default()
        }
    }
}

fn load_one(path: &Path) -> SettingsFile {
    if !path.exists() {
        return SettingsFile::default();
    }
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(error) => {
            tracing::warn!(
                path = %path.display(),
                error = %error,
                "failed to read settings file; ignoring"
            );
            return SettingsFile::default();
        }
    };
    match serde_yaml::from_str::<SettingsFile>(&raw) {
        Ok(value) => value,
        Err(error) => {
            tracing::warn!(
                path = %path.display(),
                error = %error,
                "failed to parse settings yaml; ignoring file"
            );
            SettingsFile::default()
        }
    }
}

fn project_root() -> PathBuf {
    std::env::var("PRJ_ROOT")
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

fn resolve_config_home(project_root: &Path) -> PathBuf {
    let configured = std::env::var("PRJ_CONFIG_HOME")
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| DEFAULT_CONFIG_HOME_RELATIVE_PATH.to_string());
    absolutize(project_root, PathBuf::from(configured))
}

fn absolutize(project_root: &Path, path: PathBuf) -> PathBuf {
    if path.is_absolute() {
        path
    } else {
        project_root.join(path)
    }
}
