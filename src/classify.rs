//! Group samples by tissue type.

use log::info;

use crate::manifest::ManifestRecord;

/// Tissue bucket for a manifest line. Matching is substring-based and
/// first-match-wins: `Brain` against the stem name, then `Kidney`, `BB`
/// and `FB` against the whole source line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tissue {
    Brain,
    Kidney,
    Blood,
}

impl Tissue {
    /// Classify one record, or `None` when no tissue rule matches.
    pub fn of(record: &ManifestRecord) -> Option<Tissue> {
        if record.stem_name.contains("Brain") {
            Some(Tissue::Brain)
        } else if record.line.contains("Kidney") {
            Some(Tissue::Kidney)
        } else if record.line.contains("BB") || record.line.contains("FB") {
            Some(Tissue::Blood)
        } else {
            None
        }
    }
}

/// Stem-name group lists for the configuration document, in manifest
/// order. Lists are not deduplicated, so `all` has one entry per manifest
/// line and each stem name lands in at most one tissue list.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Classifications {
    pub all: Vec<String>,
    pub brain: Vec<String>,
    pub kidney: Vec<String>,
    pub blood: Vec<String>,
}

impl Classifications {
    pub fn num_samples(&self) -> usize {
        self.all.len()
    }
}

/// Bucket every record's stem name into the group lists.
pub fn classify_records(records: &[ManifestRecord]) -> Classifications {
    let mut groups = Classifications::default();

    for record in records {
        groups.all.push(record.stem_name.clone());
        let list = match Tissue::of(record) {
            Some(Tissue::Brain) => &mut groups.brain,
            Some(Tissue::Kidney) => &mut groups.kidney,
            Some(Tissue::Blood) => &mut groups.blood,
            None => continue,
        };
        list.push(record.stem_name.clone());
    }

    info!(
        "classified {} samples: {} brain, {} kidney, {} blood",
        groups.all.len(),
        groups.brain.len(),
        groups.kidney.len(),
        groups.blood.len()
    );
    groups
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    fn record(line: &str) -> ManifestRecord {
        ManifestRecord::parse(line, 1).unwrap()
    }

    #[test]
    fn test_three_way_scenario() {
        let records = vec![
            record("E1_Brain.FC_L1_R1_IT.fastq.gz\tA00127:312:HVNLJDSXY:2:1101:2211:1000"),
            record("E2_Kidney.FC_L1_R1_IT.fastq.gz\tA00127:312:HVNLJDSXY:2:1101:2211:1000"),
            record("E3_Liver.FC_L1_R1_IT.fastq.gz\tA00127:312:HVNLJDSXY:2:1101:2211:1000"),
        ];

        let groups = classify_records(&records);
        assert_eq!(groups.num_samples(), 3);
        assert_eq!(groups.all.len(), 3);
        assert_eq!(groups.brain, vec!["E1_Brain_L1"]);
        assert_eq!(groups.kidney, vec!["E2_Kidney_L1"]);
        assert_eq!(groups.blood, Vec::<String>::new());
    }

    #[test]
    fn test_first_match_wins() {
        // Brain in the stem name shadows a Kidney mention elsewhere in the line
        let r = record("E4_Brain.Kidney_L2_R1_IT.fastq.gz\tA00127:312:HVNLJDSXY:2:1101:2211:1000");
        assert_eq!(Tissue::of(&r), Some(Tissue::Brain));

        let groups = classify_records(&[r]);
        assert_eq!(groups.brain.len(), 1);
        assert_eq!(groups.kidney.len(), 0);
    }

    #[test]
    fn test_blood_matches_bb_and_fb() {
        let bb = record("E5_BB.FC_L1_R1_IT.fastq.gz\tA00127:312:HVNLJDSXY:2:1101:2211:1000");
        let fb = record("E6_FB.FC_L1_R1_IT.fastq.gz\tA00127:312:HVNLJDSXY:2:1101:2211:1000");
        assert_eq!(Tissue::of(&bb), Some(Tissue::Blood));
        assert_eq!(Tissue::of(&fb), Some(Tissue::Blood));

        let groups = classify_records(&[bb, fb]);
        assert_eq!(groups.blood, vec!["E5_BB_L1", "E6_FB_L1"]);
    }

    #[test]
    fn test_kidney_matches_anywhere_in_line() {
        // tissue token is not in the stem, but the line still says Kidney
        let r = record("E7_Cortex.FC_L1_R1_Kidney.fastq.gz\tA00127:312:HVNLJDSXY:2:1101:2211:1000");
        assert_eq!(Tissue::of(&r), Some(Tissue::Kidney));
    }

    #[test]
    fn test_unclassified() {
        let r = record("E8_Liver.FC_L1_R1_IT.fastq.gz\tA00127:312:HVNLJDSXY:2:1101:2211:1000");
        assert_eq!(Tissue::of(&r), None);

        let groups = classify_records(&[r]);
        assert_eq!(groups.all.len(), 1);
        assert!(groups.brain.is_empty() && groups.kidney.is_empty() && groups.blood.is_empty());
    }
}
