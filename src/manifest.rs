//! Parse the sample read-group manifest.
//!
//! Each non-empty manifest line carries two whitespace-delimited fields: a
//! FASTQ filename of the form
//! `E1_Brain.FCHVC2VDRXY_L1_R1_ITAAGTGGT-CTTAAGCC.fastq.gz` and the read
//! identifier of its first read,
//! `A00127:312:HVNLJDSXY:2:1101:2211:1000`
//! (`<instrument>:<run>:<flowcell>:<lane>:<tile>:<x>:<y>`).

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::{Context, Error};
use itertools::Itertools;
use lazy_static::lazy_static;
use log::debug;
use regex::Regex;
use thiserror::Error as ThisError;

lazy_static! {
    static ref READ_ID_REGEX: Regex =
        Regex::new(r"^([^:\s]+):(\d+):([^:\s]+):(\d+)(?::\S*)?$").unwrap();
}

/// Errors produced while parsing manifest lines. Line numbers are 1-based.
#[derive(ThisError, Debug, Clone, PartialEq, Eq)]
pub enum ManifestError {
    #[error("manifest line {line}: expected 2 whitespace-delimited fields, got {found}")]
    TooFewFields { line: usize, found: usize },

    #[error("manifest line {line}: filename {name:?} has fewer than 4 name tokens")]
    BadFilename { line: usize, name: String },

    #[error(
        "manifest line {line}: read identifier {id:?} is not of the form \
         <instrument>:<run>:<flowcell>:<lane>[:...]"
    )]
    BadReadId { line: usize, id: String },
}

/// The `<instrument>:<run>:<flowcell>:<lane>` prefix of an Illumina read
/// identifier. Tile and position fields are accepted and ignored.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReadGroupInfo {
    pub instrument: String,
    pub run_number: u32,
    pub flowcell_id: String,
    pub lane: u32,
}

impl ReadGroupInfo {
    fn parse(id: &str, line_no: usize) -> Result<ReadGroupInfo, ManifestError> {
        let cap = READ_ID_REGEX
            .captures(id)
            .ok_or_else(|| ManifestError::BadReadId {
                line: line_no,
                id: id.to_string(),
            })?;

        Ok(ReadGroupInfo {
            instrument: cap.get(1).unwrap().as_str().to_string(),
            run_number: cap.get(2).unwrap().as_str().parse().unwrap(),
            flowcell_id: cap.get(3).unwrap().as_str().to_string(),
            lane: cap.get(4).unwrap().as_str().parse().unwrap(),
        })
    }

    /// Platform unit: flowcell and lane, e.g. `HVNLJDSXY.2`.
    pub fn pu(&self) -> String {
        format!("{}.{}", self.flowcell_id, self.lane)
    }
}

/// One manifest line together with its derived naming fields.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ManifestRecord {
    /// Canonical short sample name: name tokens 0, 1 and 3 of the filename
    /// joined with `_`, e.g. `E1_Brain_L1`. Shared by both reads of a pair.
    pub stem_name: String,
    /// FASTQ filename with any trailing `.fastq[.gz]` removed.
    pub sample_name1: String,
    /// `sample_name1` with the first `R1` replaced by `R2`. Equals
    /// `sample_name1` when the filename does not name read R1; whether the
    /// R2 file actually exists is not checked.
    pub sample_name2: String,
    pub short_name1: String,
    pub short_name2: String,
    pub read_group: ReadGroupInfo,
    /// Raw source line. Tissue classification matches against it.
    pub line: String,
}

impl ManifestRecord {
    /// Parse one manifest line. `line_no` is 1-based and used only in errors.
    pub fn parse(line: &str, line_no: usize) -> Result<ManifestRecord, ManifestError> {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < 2 {
            return Err(ManifestError::TooFewFields {
                line: line_no,
                found: fields.len(),
            });
        }

        // Dots and underscores both separate name tokens, so
        // `E1_Brain.FCHVC2VDRXY_L1_R1_...` yields E1, Brain, FCHVC2VDRXY, L1, ...
        let filename = fields[0];
        let tokens: Vec<&str> = filename.split(['.', '_']).collect();
        if tokens.len() < 4 {
            return Err(ManifestError::BadFilename {
                line: line_no,
                name: filename.to_string(),
            });
        }
        let stem_name = [tokens[0], tokens[1], tokens[3]].iter().join("_");

        let sample_name1 = strip_fastq_suffix(filename).to_string();
        let sample_name2 = sample_name1.replacen("R1", "R2", 1);

        let read_group = ReadGroupInfo::parse(fields[1], line_no)?;

        Ok(ManifestRecord {
            short_name1: format!("{stem_name}_R1"),
            short_name2: format!("{stem_name}_R2"),
            stem_name,
            sample_name1,
            sample_name2,
            read_group,
            line: line.to_string(),
        })
    }

    /// True when the filename names read R1, i.e. the derived FASTQ pair
    /// actually differs.
    pub fn names_r1(&self) -> bool {
        self.sample_name1 != self.sample_name2
    }
}

fn strip_fastq_suffix(name: &str) -> &str {
    name.strip_suffix(".fastq.gz")
        .or_else(|| name.strip_suffix(".fastq"))
        .unwrap_or(name)
}

/// All records of a manifest file, in file order.
#[derive(Clone, Debug)]
pub struct Manifest {
    pub records: Vec<ManifestRecord>,
}

impl Manifest {
    /// Read and parse `path` in a single pass. Blank lines are skipped;
    /// any malformed line aborts the parse.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Manifest, Error> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("opening manifest {}", path.display()))?;

        let mut records = Vec::new();
        for (idx, line) in BufReader::new(file).lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            records.push(ManifestRecord::parse(&line, idx + 1)?);
        }

        debug!(
            "parsed {} records from manifest {}",
            records.len(),
            path.display()
        );
        Ok(Manifest { records })
    }

    pub fn num_samples(&self) -> usize {
        self.records.len()
    }
}
