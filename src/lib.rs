//! Generate a pipeline configuration file from a sequencing sample
//! manifest.
//!
//! A manifest line pairs a FASTQ filename with the Illumina read
//! identifier of its first read. [`ConfigBuilder`] parses the manifest,
//! derives a canonical short name per sample, groups samples by tissue
//! type, and writes the JSON configuration document consumed by the
//! downstream workflow manager.

pub mod builder;
pub mod classify;
pub mod config;
pub mod manifest;

pub use crate::builder::ConfigBuilder;
pub use crate::classify::{classify_records, Classifications, Tissue};
pub use crate::config::{ConfigDocument, PipelinePaths, SampleEntry};
pub use crate::manifest::{Manifest, ManifestError, ManifestRecord, ReadGroupInfo};
