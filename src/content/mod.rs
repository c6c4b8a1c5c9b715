//! Content domain: RON data files under `assets/data/`.
//!
//! Everything is read once before startup. A file that fails to load keeps
//! its defaults so the game still runs; range problems are only warned about.

mod loader;
mod validation;

pub use loader::{
    COURSE_FILE, ContentLoadError, KEYCHAIN_FILE, LOCOMOTION_FILE, LoadedContent, RHYTHM_FILE,
    load_all_content, load_tuning, parse_single,
};
pub use validation::{ValidationError, validate_content};

use std::path::Path;

use bevy::prelude::*;

use crate::content::loader::log_load_errors;

/// Directory the data files are read from, relative to the working directory.
pub const DATA_DIR: &str = "assets/data";

pub struct ContentPlugin;

impl Plugin for ContentPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(PreStartup, load_content);
    }
}

fn load_content(mut commands: Commands) {
    let (content, errors) = load_all_content(Path::new(DATA_DIR));
    log_load_errors(&errors);
    log_validation_errors(&validate_content(&content));

    info!(
        "Loaded content from {}: {} charms, course seed {} ({} files fell back to defaults)",
        DATA_DIR,
        content.keychain.charms.len(),
        content.course.seed,
        errors.len()
    );

    commands.insert_resource(content.movement);
    commands.insert_resource(content.rhythm);
    commands.insert_resource(content.keychain);
    commands.insert_resource(content.course);
}

pub(crate) fn log_validation_errors(errors: &[ValidationError]) {
    for err in errors {
        warn!("Invalid content: {}", err);
    }
}
