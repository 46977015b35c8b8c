//! The pipeline configuration document and its JSON rendering.
//!
//! The document is a single JSON object: a fixed header (directories,
//! reference genome locations, sample group lists) followed by one entry
//! per sample keyed by stem name, in manifest order. Key names and order
//! are part of the contract with the downstream workflow manager and are
//! preserved verbatim, including the historical spelling of the first
//! comment key.

use std::collections::HashMap;

use anyhow::Error;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::ser::PrettyFormatter;

use crate::classify::Classifications;
use crate::manifest::ManifestRecord;

/// Sequencing platform recorded in every read group.
const PLATFORM: &str = "Illumina";

/// Reads of a pair, as listed in the document header.
const READS: [&str; 2] = ["R1", "R2"];

const COMMENT_DIRS: &str =
    "This section specifies the input and output directories for scripts";
const COMMENT_REFERENCE: &str =
    "This section specifies the location of the Sus scrofa, Ensembl reference genome";
const COMMENT_SAMPLES: &str =
    "The following section lists the samples that are to be analyzed";

/// Fixed path values of the configuration header: pipeline input/output
/// directories and reference genome locations. The key set is fixed;
/// the defaults are the project layout the downstream workflow expects.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PipelinePaths {
    pub raw_reads: String,
    pub raw_qc: String,
    pub trimmed_reads: String,
    pub trimmed_qc: String,
    pub star_aligned: String,
    pub bamstats: String,
    pub kallisto: String,
    pub genome_ymasked_fa: String,
    pub cdna_ymasked_fa: String,
    pub genome_fa: String,
    pub genome_gtf: String,
    pub star_ref_index: String,
    pub kallisto_ref_index: String,
}

impl Default for PipelinePaths {
    fn default() -> PipelinePaths {
        let reference = "/research/labs/neurology/fryer/projects/references/pig/ensembl_v7";
        PipelinePaths {
            raw_reads: "/research/labs/neurology/fryer/projects/sepsis/pig/Ecoli/bulkRNA/"
                .to_string(),
            raw_qc: "../../rawQC/".to_string(),
            trimmed_reads: "../../trimmedReads/".to_string(),
            trimmed_qc: "../../trimmedQC/".to_string(),
            star_aligned: "../../starAligned/".to_string(),
            bamstats: "../../bamstats/".to_string(),
            kallisto: "../../kallisto/".to_string(),
            genome_ymasked_fa: format!("{reference}/Sus_scrofa.Sscrofa11.1.dna.toplevel.Ymask"),
            cdna_ymasked_fa: format!("{reference}/Sus_scrofa.Sscrofa11.1.cdna.all.Ymask"),
            genome_fa: format!("{reference}/Sscrofa11.1.dna.toplevel"),
            genome_gtf: format!("{reference}/Sus_scrofa.Sscrofa11.1.107"),
            star_ref_index: format!("{reference}/Sus_scrofa.Sscrofa11.1.dna.toplevel_star_Ymask"),
            kallisto_ref_index: format!("{reference}/Sus_scrofa.Sscrofa11.1.cdna.all.Ymask.kallisto"),
        }
    }
}

/// One per-sample entry of the configuration document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SampleEntry {
    /// Document key of this entry; not serialized as a field.
    #[serde(skip)]
    pub stem_name: String,
    pub fq_path: String,
    pub fq1: String,
    pub fq2: String,
    #[serde(rename = "shortName1")]
    pub short_name1: String,
    #[serde(rename = "shortName2")]
    pub short_name2: String,
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "SM")]
    pub sm: String,
    #[serde(rename = "PU")]
    pub pu: String,
    #[serde(rename = "LB")]
    pub lb: String,
    #[serde(rename = "PL")]
    pub pl: String,
}

impl SampleEntry {
    fn from_record(record: &ManifestRecord, fq_path: &str) -> SampleEntry {
        SampleEntry {
            stem_name: record.stem_name.clone(),
            fq_path: fq_path.to_string(),
            fq1: record.sample_name1.clone(),
            fq2: record.sample_name2.clone(),
            short_name1: record.short_name1.clone(),
            short_name2: record.short_name2.clone(),
            id: record.stem_name.clone(),
            sm: record.stem_name.clone(),
            pu: record.read_group.pu(),
            lb: record.stem_name.clone(),
            pl: PLATFORM.to_string(),
        }
    }

    fn names_r1(&self) -> bool {
        self.fq1 != self.fq2
    }
}

/// The full configuration document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConfigDocument {
    pub paths: PipelinePaths,
    pub groups: Classifications,
    pub samples: Vec<SampleEntry>,
}

impl ConfigDocument {
    /// Assemble the document from classified records.
    ///
    /// Records sharing a stem name (the R1 and R2 lines of one pair)
    /// collapse into a single entry: an entry derived from an R1 filename
    /// wins over one that is not, and the first occurrence wins among
    /// equals.
    pub fn new(
        paths: PipelinePaths,
        groups: Classifications,
        records: &[ManifestRecord],
    ) -> ConfigDocument {
        let mut samples: Vec<SampleEntry> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();

        for record in records {
            match index.get(&record.stem_name) {
                None => {
                    index.insert(record.stem_name.clone(), samples.len());
                    samples.push(SampleEntry::from_record(record, &paths.raw_reads));
                }
                Some(&at) => {
                    if !samples[at].names_r1() && record.names_r1() {
                        samples[at] = SampleEntry::from_record(record, &paths.raw_reads);
                    }
                }
            }
        }

        ConfigDocument {
            paths,
            groups,
            samples,
        }
    }

    /// Render the document as JSON with 4-space indentation and a trailing
    /// newline. Output is deterministic for a given document.
    pub fn to_json_string(&self) -> Result<String, Error> {
        let mut buf = Vec::new();
        let fmt = PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, fmt);
        self.serialize(&mut ser)?;
        buf.push(b'\n');
        Ok(String::from_utf8(buf)?)
    }
}

impl Serialize for ConfigDocument {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(21 + self.samples.len()))?;

        map.serialize_entry("Commment_Input_Output_Directories", COMMENT_DIRS)?;
        map.serialize_entry("rawReads", &self.paths.raw_reads)?;
        map.serialize_entry("rawQC", &self.paths.raw_qc)?;
        map.serialize_entry("trimmedReads", &self.paths.trimmed_reads)?;
        map.serialize_entry("trimmedQC", &self.paths.trimmed_qc)?;
        map.serialize_entry("starAligned", &self.paths.star_aligned)?;
        map.serialize_entry("bamstats", &self.paths.bamstats)?;
        map.serialize_entry("kallisto", &self.paths.kallisto)?;

        map.serialize_entry("Comment_Reference", COMMENT_REFERENCE)?;
        map.serialize_entry("Sscrofa.Ymasked.fa", &self.paths.genome_ymasked_fa)?;
        map.serialize_entry("Scrofa.cdna.Ymasked.fa", &self.paths.cdna_ymasked_fa)?;
        map.serialize_entry("Sscrofa.fa", &self.paths.genome_fa)?;
        map.serialize_entry("Sscrofa.gtf", &self.paths.genome_gtf)?;
        map.serialize_entry("star_ref_index", &self.paths.star_ref_index)?;
        map.serialize_entry("kallisto_ref_index", &self.paths.kallisto_ref_index)?;

        map.serialize_entry("Comment_Sample_Info", COMMENT_SAMPLES)?;
        map.serialize_entry("sample_names", &self.groups.all)?;
        map.serialize_entry("brain_names", &self.groups.brain)?;
        map.serialize_entry("kidney_names", &self.groups.kidney)?;
        map.serialize_entry("blood_names", &self.groups.blood)?;
        map.serialize_entry("read", &READS)?;

        for entry in &self.samples {
            map.serialize_entry(&entry.stem_name, entry)?;
        }

        map.end()
    }
}
