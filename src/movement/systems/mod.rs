//! Movement domain: system modules for locomotion updates.

pub(crate) mod drive;
pub(crate) mod input;
pub(crate) mod look;
pub(crate) mod probes;

pub(crate) use drive::{capsule_collider, drive_locomotion};
pub(crate) use input::read_input;
pub(crate) use look::{mouse_look, sync_camera};
pub(crate) use probes::sample_probes;
