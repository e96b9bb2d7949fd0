//! Drivers for FreeSurfer's TRACULA `trac-all` pipeline.
//!
//! Two binaries share this library: `run-trac-all` (one subject) and
//! `run-trac-all-longitudinal` (timepoints of one subject against a template).
//! Each validates its inputs, runs `trac-all -prep` and `-path` with a generated
//! dmrirc, and records inputs, outputs and runtime as JSON under
//! `<output_dir>/logs/`.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
