//! Loader for RON content files at startup.

use bevy::prelude::*;
use ron::Options;
use std::fs;
use std::path::Path;

use crate::charms::KeychainDef;
use crate::core::CourseDef;
use crate::movement::MovementTuning;
use crate::rhythm::RhythmTuning;

pub const LOCOMOTION_FILE: &str = "locomotion.ron";
pub const RHYTHM_FILE: &str = "rhythm.ron";
pub const KEYCHAIN_FILE: &str = "keychain.ron";
pub const COURSE_FILE: &str = "course.ron";

/// Error type for content loading failures.
#[derive(Debug)]
pub struct ContentLoadError {
    pub file: String,
    pub message: String,
}

impl std::fmt::Display for ContentLoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Failed to load {}: {}", self.file, self.message)
    }
}

impl std::error::Error for ContentLoadError {}

/// Everything read from `assets/data/`. Files that failed to load hold
/// their defaults.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadedContent {
    pub movement: MovementTuning,
    pub rhythm: RhythmTuning,
    pub keychain: KeychainDef,
    pub course: CourseDef,
}

/// Create RON options with extensions enabled for more flexible parsing.
fn ron_options() -> Options {
    Options::default().with_default_extension(ron::extensions::Extensions::IMPLICIT_SOME)
}

/// Parse a single RON struct from a string.
pub fn parse_single<T>(file_name: &str, contents: &str) -> Result<T, ContentLoadError>
where
    T: for<'de> serde::Deserialize<'de>,
{
    ron_options()
        .from_str(contents)
        .map_err(|e| ContentLoadError {
            file: file_name.to_string(),
            message: format!("Parse error: {}", e),
        })
}

/// Load a single RON struct from disk.
fn load_single_file<T>(path: &Path) -> Result<T, ContentLoadError>
where
    T: for<'de> serde::Deserialize<'de>,
{
    let file_name = path.display().to_string();
    let contents = fs::read_to_string(path).map_err(|e| ContentLoadError {
        file: file_name.clone(),
        message: format!("IO error: {}", e),
    })?;

    parse_single(&file_name, &contents)
}

/// Load one file, falling back to the default and recording the error.
fn load_or_default<T>(path: &Path, errors: &mut Vec<ContentLoadError>) -> T
where
    T: for<'de> serde::Deserialize<'de> + Default,
{
    match load_single_file(path) {
        Ok(value) => value,
        Err(e) => {
            errors.push(e);
            T::default()
        }
    }
}

/// Load all content from `base_path`.
///
/// Never fails outright: every file that cannot be read or parsed keeps its
/// defaults and contributes one error to the returned list.
pub fn load_all_content(base_path: &Path) -> (LoadedContent, Vec<ContentLoadError>) {
    let mut errors = Vec::new();

    let content = LoadedContent {
        movement: load_or_default(&base_path.join(LOCOMOTION_FILE), &mut errors),
        rhythm: load_or_default(&base_path.join(RHYTHM_FILE), &mut errors),
        keychain: load_or_default(&base_path.join(KEYCHAIN_FILE), &mut errors),
        course: load_or_default(&base_path.join(COURSE_FILE), &mut errors),
    };

    (content, errors)
}

/// Reload just the tuning files, for hot reload.
pub fn load_tuning(base_path: &Path) -> (MovementTuning, RhythmTuning, Vec<ContentLoadError>) {
    let mut errors = Vec::new();
    let movement = load_or_default(&base_path.join(LOCOMOTION_FILE), &mut errors);
    let rhythm = load_or_default(&base_path.join(RHYTHM_FILE), &mut errors);
    (movement, rhythm, errors)
}

pub(crate) fn log_load_errors(errors: &[ContentLoadError]) {
    for err in errors {
        error!("{}; using defaults", err);
    }
}
