//! Top-level orchestration: manifest in, configuration file out.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Error};
use log::info;

use crate::classify::classify_records;
use crate::config::{ConfigDocument, PipelinePaths};
use crate::manifest::Manifest;

/// Builds a pipeline configuration file from a read-group manifest.
///
/// `build` parses the manifest, classifies the samples by tissue, renders
/// the configuration document and overwrites `output_path` with it.
#[derive(Clone, Debug)]
pub struct ConfigBuilder {
    /// Path to the `sampleReadGroupInfo.txt` manifest.
    pub manifest_path: PathBuf,
    /// Path of the configuration file to (over)write.
    pub output_path: PathBuf,
    /// Header path values. `PipelinePaths::default()` is the standard layout.
    pub paths: PipelinePaths,
}

impl ConfigBuilder {
    pub fn new(
        manifest_path: impl Into<PathBuf>,
        output_path: impl Into<PathBuf>,
    ) -> ConfigBuilder {
        ConfigBuilder {
            manifest_path: manifest_path.into(),
            output_path: output_path.into(),
            paths: PipelinePaths::default(),
        }
    }

    /// Run the whole transform. Any parse or I/O failure aborts the run;
    /// a partially written output file is not cleaned up.
    pub fn build(&self) -> Result<(), Error> {
        let manifest = Manifest::from_file(&self.manifest_path)?;
        let groups = classify_records(&manifest.records);
        let doc = ConfigDocument::new(self.paths.clone(), groups, &manifest.records);

        let rendered = doc.to_json_string()?;
        fs::write(&self.output_path, rendered)
            .with_context(|| format!("writing {}", self.output_path.display()))?;

        info!(
            "wrote {} sample entries from {} to {}",
            doc.samples.len(),
            self.manifest_path.display(),
            self.output_path.display()
        );
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use file_diff::diff;
    use pretty_assertions::assert_eq;
    use serde_json::Value;
    use tempfile::TempDir;

    const MANIFEST: &str = "test/manifest/sampleReadGroupInfo.txt";

    #[test]
    fn test_build_fixture() -> Result<(), Error> {
        let tmp_dir = TempDir::new()?;
        let out = tmp_dir.path().join("config.json");

        ConfigBuilder::new(MANIFEST, &out).build()?;

        let json: Value = serde_json::from_str(&fs::read_to_string(&out)?)?;

        // six manifest lines, one of which is the R2 half of a pair
        assert_eq!(json["sample_names"].as_array().unwrap().len(), 6);
        assert_eq!(
            json["brain_names"],
            serde_json::json!(["E1_Brain_L1", "E1_Brain_L1"])
        );
        assert_eq!(json["kidney_names"], serde_json::json!(["E2_Kidney_L1"]));
        assert_eq!(
            json["blood_names"],
            serde_json::json!(["E3_BB_L2", "E4_FB_L2"])
        );

        // 21 header keys + 5 merged sample entries
        assert_eq!(json.as_object().unwrap().len(), 26);

        // the R1/R2 pair merged into one entry carrying both files
        let brain = &json["E1_Brain_L1"];
        assert_eq!(
            brain["fq1"],
            "E1_Brain.FCHVC2VDRXY_L1_R1_ITAAGTGGT-CTTAAGCC"
        );
        assert_eq!(
            brain["fq2"],
            "E1_Brain.FCHVC2VDRXY_L1_R2_ITAAGTGGT-CTTAAGCC"
        );
        assert_eq!(brain["PU"], "HVNLJDSXY.2");
        assert_eq!(brain["PL"], "Illumina");
        Ok(())
    }

    #[test]
    fn test_build_is_idempotent() -> Result<(), Error> {
        let tmp_dir = TempDir::new()?;
        let out1 = tmp_dir.path().join("config1.json");
        let out2 = tmp_dir.path().join("config2.json");

        ConfigBuilder::new(MANIFEST, &out1).build()?;
        ConfigBuilder::new(MANIFEST, &out2).build()?;

        assert!(diff(out1.to_str().unwrap(), out2.to_str().unwrap()));
        Ok(())
    }

    #[test]
    fn test_missing_manifest_is_fatal() {
        let tmp_dir = TempDir::new().unwrap();
        let out = tmp_dir.path().join("config.json");

        let err = ConfigBuilder::new("test/manifest/no_such_file.txt", &out)
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("no_such_file.txt"));
        assert!(!out.exists());
    }
}
