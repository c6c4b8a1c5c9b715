//! Validation for value ranges in loaded content.
//!
//! Loading only guarantees the files parse. These checks catch numbers that
//! parse fine but would make the controller or the rhythm engine misbehave.

use super::loader::LoadedContent;

/// A validation error with context about what failed.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    pub section: &'static str,
    pub field: &'static str,
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}: {}", self.section, self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Helper macro for checking a condition on one field
macro_rules! check {
    ($errors:expr, $section:expr, $field:expr, $cond:expr, $($msg:tt)+) => {
        if !$cond {
            $errors.push(ValidationError {
                section: $section,
                field: $field,
                message: format!($($msg)+),
            });
        }
    };
}

/// Validate every section of the loaded content.
/// Returns a list of validation errors, empty if everything is in range.
pub fn validate_content(content: &LoadedContent) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    validate_movement(content, &mut errors);
    validate_rhythm(content, &mut errors);
    validate_keychain(content, &mut errors);
    validate_course(content, &mut errors);
    errors
}

fn validate_movement(content: &LoadedContent, errors: &mut Vec<ValidationError>) {
    const S: &str = "locomotion";
    let t = &content.movement;

    check!(errors, S, "gravity", t.gravity > 0.0, "must be positive, got {}", t.gravity);
    check!(
        errors,
        S,
        "walk_speed",
        t.walk_speed > 0.0,
        "must be positive, got {}",
        t.walk_speed
    );
    check!(
        errors,
        S,
        "run_speed",
        t.run_speed >= t.walk_speed,
        "must be at least walk_speed ({}), got {}",
        t.walk_speed,
        t.run_speed
    );
    check!(
        errors,
        S,
        "jump_force",
        t.jump_force > 0.0,
        "must be positive, got {}",
        t.jump_force
    );
    check!(
        errors,
        S,
        "slide_max_speed",
        t.slide_max_speed >= t.slide_start_speed,
        "must be at least slide_start_speed ({}), got {}",
        t.slide_start_speed,
        t.slide_max_speed
    );
    check!(
        errors,
        S,
        "slide_friction",
        t.slide_friction >= 0.0,
        "must not be negative, got {}",
        t.slide_friction
    );
    check!(
        errors,
        S,
        "slide_penalty_decay",
        t.slide_penalty_decay >= 0.0,
        "must not be negative, got {}",
        t.slide_penalty_decay
    );
    check!(
        errors,
        S,
        "slide_pitch_min",
        t.slide_pitch_min <= t.slide_pitch_max,
        "must not exceed slide_pitch_max ({}), got {}",
        t.slide_pitch_max,
        t.slide_pitch_min
    );
    check!(
        errors,
        S,
        "pitch_min",
        t.pitch_min <= t.pitch_max,
        "must not exceed pitch_max ({}), got {}",
        t.pitch_max,
        t.pitch_min
    );
    check!(
        errors,
        S,
        "high_fall_threshold",
        t.high_fall_threshold < 0.0,
        "must be negative, got {}",
        t.high_fall_threshold
    );
    check!(
        errors,
        S,
        "stagger_speed_factor",
        (0.0..=1.0).contains(&t.stagger_speed_factor),
        "must be within 0..=1, got {}",
        t.stagger_speed_factor
    );
    check!(
        errors,
        S,
        "roll_angular_speed",
        t.roll_angular_speed > 0.0,
        "must be positive, got {}",
        t.roll_angular_speed
    );
    check!(
        errors,
        S,
        "capsule_radius",
        t.capsule_radius > 0.0,
        "must be positive, got {}",
        t.capsule_radius
    );
    check!(
        errors,
        S,
        "slide_height",
        t.slide_height >= 2.0 * t.capsule_radius && t.slide_height <= t.standing_height,
        "must fit between the capsule diameter ({}) and standing_height ({}), got {}",
        2.0 * t.capsule_radius,
        t.standing_height,
        t.slide_height
    );
}

fn validate_rhythm(content: &LoadedContent, errors: &mut Vec<ValidationError>) {
    const S: &str = "rhythm";
    let t = &content.rhythm;

    check!(
        errors,
        S,
        "detection_distance",
        t.detection_distance < t.start_distance,
        "must be below start_distance ({}), got {}",
        t.start_distance,
        t.detection_distance
    );
    check!(
        errors,
        S,
        "expiry_distance",
        t.expiry_distance >= 0.0 && t.expiry_distance < t.detection_distance,
        "must be within 0..detection_distance ({}), got {}",
        t.detection_distance,
        t.expiry_distance
    );
    check!(
        errors,
        S,
        "charge_decay_rate",
        t.charge_decay_rate >= 0.0,
        "must not be negative, got {}",
        t.charge_decay_rate
    );
    check!(
        errors,
        S,
        "multiplier_bands",
        t.multiplier_bands.windows(2).all(|pair| pair[0].below < pair[1].below),
        "bands must be strictly ascending by `below`"
    );
    for cue in &t.cues {
        check!(
            errors,
            S,
            "cues",
            cue.closing_speed > 0.0,
            "{:?} cue needs a positive closing_speed, got {}",
            cue.event,
            cue.closing_speed
        );
    }
}

fn validate_keychain(content: &LoadedContent, errors: &mut Vec<ValidationError>) {
    const S: &str = "keychain";
    let k = &content.keychain;

    check!(errors, S, "capacity", k.capacity > 0, "must be at least 1");
    check!(
        errors,
        S,
        "charms",
        k.charms.len() <= k.capacity,
        "{} charms listed for {} slots; extras are skipped",
        k.charms.len(),
        k.capacity
    );
}

fn validate_course(content: &LoadedContent, errors: &mut Vec<ValidationError>) {
    const S: &str = "course";
    let c = &content.course;

    check!(
        errors,
        S,
        "ground_size",
        c.ground_size > 0.0,
        "must be positive, got {}",
        c.ground_size
    );
    check!(
        errors,
        S,
        "wall_gap",
        c.wall_gap > 2.0 * content.movement.capsule_radius,
        "must leave room for the player capsule, got {}",
        c.wall_gap
    );
    check!(
        errors,
        S,
        "ramp_slope",
        c.ramp_slope > 0.0 && c.ramp_slope < 60.0,
        "must be within 0..60 degrees, got {}",
        c.ramp_slope
    );
}
