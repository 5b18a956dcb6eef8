//! Tagged benchmark run registry
//!
//! Results live at `<results_dir>/<tag>.json`. Tag uniqueness is not enforced
//! by the filesystem, so the collision check runs before every benchmark and
//! an existing tag is only reused after the operator confirms the overwrite.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use log::{debug, info};

use super::result::BenchmarkResult;
use crate::config::write_json_atomic;
use crate::deadline::Deadline;
use crate::error::{RegistryError, Result};
use crate::prompt::ConfirmPrompt;

/// Default directory holding tagged results
pub const DEFAULT_RESULTS_DIR: &str = "results/run/responseTimes";

/// Extension of stored result files
const RESULT_EXTENSION: &str = "json";

/// Outcome of tag registration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagDecision {
    /// Tag was unused
    New(String),
    /// Tag existed and the operator agreed to overwrite it
    ConfirmedOverwrite(String),
}

impl TagDecision {
    pub fn tag(&self) -> &str {
        match self {
            TagDecision::New(tag) | TagDecision::ConfirmedOverwrite(tag) => tag,
        }
    }
}

/// Trim a tag and make sure it names a single file in the results directory.
pub fn validate_tag(tag: &str) -> Result<String> {
    let tag = tag.trim();
    if tag.is_empty() {
        return Err(RegistryError::MissingTag.into());
    }
    if tag == "." || tag == ".." || tag.contains(['/', '\\']) {
        return Err(RegistryError::InvalidTag(tag.to_string()).into());
    }
    Ok(tag.to_string())
}

/// Accept `tag` if unused; otherwise ask before allowing an overwrite.
///
/// Runs before any benchmark request so a declined overwrite costs nothing.
pub async fn register_tag(
    tag: &str,
    existing_tags: &BTreeSet<String>,
    prompt: &dyn ConfirmPrompt,
    deadline: Deadline,
) -> Result<TagDecision> {
    let tag = validate_tag(tag)?;
    if !existing_tags.contains(&tag) {
        debug!("Tag '{}' is new", tag);
        return Ok(TagDecision::New(tag));
    }

    let question = format!("Tag '{}' already exists. Do you want to overwrite it?", tag);
    let overwrite = deadline
        .run("waiting for overwrite confirmation", prompt.confirm(&question))
        .await?;

    if overwrite {
        info!("Overwriting existing run '{}'", tag);
        Ok(TagDecision::ConfirmedOverwrite(tag))
    } else {
        Err(RegistryError::DuplicateTag(tag).into())
    }
}

/// Directory of stored benchmark results
#[derive(Debug, Clone)]
pub struct RunRegistry {
    dir: PathBuf,
}

impl RunRegistry {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Registry at `dir`, or the default results directory
    pub fn at(dir: Option<&str>) -> Self {
        Self::new(dir.unwrap_or(DEFAULT_RESULTS_DIR))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Tags of all stored runs, sorted. A missing directory holds no runs.
    pub fn existing_tags(&self) -> Result<BTreeSet<String>> {
        if !self.dir.exists() {
            return Ok(BTreeSet::new());
        }

        let mut tags = BTreeSet::new();
        for entry in std::fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(RESULT_EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                tags.insert(stem.to_string());
            }
        }
        Ok(tags)
    }

    /// File backing `tag`
    pub fn path_for(&self, tag: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", tag, RESULT_EXTENSION))
    }

    /// Persist `result` under a registered tag.
    pub fn save(&self, decision: &TagDecision, result: &BenchmarkResult) -> Result<PathBuf> {
        let path = self.path_for(decision.tag());
        write_json_atomic(&path, result)?;
        info!("Saved run '{}' to {}", decision.tag(), path.display());
        Ok(path)
    }

    /// Load the run stored under `tag`.
    pub fn load(&self, tag: &str) -> Result<BenchmarkResult> {
        let tag = validate_tag(tag)?;
        let path = self.path_for(&tag);
        if !path.exists() {
            return Err(RegistryError::UnknownTag(tag).into());
        }

        let contents = std::fs::read_to_string(&path)?;
        let result: BenchmarkResult =
            serde_json::from_str(&contents).map_err(|e| RegistryError::CorruptRun {
                tag: tag.clone(),
                reason: format!("{}: {}", path.display(), e),
            })?;
        if let Some(reason) = result.incomplete_series() {
            return Err(RegistryError::CorruptRun { tag, reason }.into());
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::prompt::testing::ScriptedPrompt;
    use chrono::Utc;
    use tempfile::tempdir;

    fn tags(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn sample_result() -> BenchmarkResult {
        let mut result = BenchmarkResult::new(vec!["profile".to_string()], 2, &Utc::now());
        result.record("profile", Some(100));
        result.record("profile", None);
        result
    }

    #[tokio::test]
    async fn test_new_tag_never_prompts() {
        let prompt = ScriptedPrompt::answering(false);
        let decision = register_tag("baseline", &tags(&["other"]), &prompt, Deadline::none())
            .await
            .unwrap();

        assert_eq!(decision, TagDecision::New("baseline".to_string()));
        assert!(prompt.asked().await.is_empty());
    }

    #[tokio::test]
    async fn test_existing_tag_declined_is_duplicate() {
        let prompt = ScriptedPrompt::answering(false);
        let result = register_tag("baseline", &tags(&["baseline"]), &prompt, Deadline::none()).await;

        match result {
            Err(Error::Registry(RegistryError::DuplicateTag(tag))) => assert_eq!(tag, "baseline"),
            other => panic!("Expected DuplicateTag, got {:?}", other),
        }
        assert_eq!(prompt.asked().await.len(), 1);
    }

    #[tokio::test]
    async fn test_existing_tag_confirmed_is_overwrite() {
        let prompt = ScriptedPrompt::answering(true);
        let decision = register_tag(" baseline ", &tags(&["baseline"]), &prompt, Deadline::none())
            .await
            .unwrap();

        assert_eq!(decision, TagDecision::ConfirmedOverwrite("baseline".to_string()));
        assert!(prompt.asked().await[0].contains("baseline"));
    }

    #[test]
    fn test_validate_tag() {
        assert!(matches!(
            validate_tag("   "),
            Err(Error::Registry(RegistryError::MissingTag))
        ));
        assert!(matches!(
            validate_tag("../escape"),
            Err(Error::Registry(RegistryError::InvalidTag(_)))
        ));
        assert!(matches!(
            validate_tag(".."),
            Err(Error::Registry(RegistryError::InvalidTag(_)))
        ));
        assert_eq!(validate_tag("v1.2-rc").unwrap(), "v1.2-rc");
    }

    #[test]
    fn test_existing_tags_of_missing_dir_is_empty() {
        let dir = tempdir().unwrap();
        let registry = RunRegistry::new(dir.path().join("none-yet"));
        assert!(registry.existing_tags().unwrap().is_empty());
    }

    #[test]
    fn test_save_then_list_and_load() {
        let dir = tempdir().unwrap();
        let registry = RunRegistry::new(dir.path().join("responseTimes"));
        let result = sample_result();

        registry
            .save(&TagDecision::New("b-run".to_string()), &result)
            .unwrap();
        registry
            .save(&TagDecision::New("a-run".to_string()), &result)
            .unwrap();
        std::fs::write(registry.dir().join("notes.txt"), "ignored").unwrap();

        let listed: Vec<String> = registry.existing_tags().unwrap().into_iter().collect();
        assert_eq!(listed, vec!["a-run", "b-run"]);
        assert_eq!(registry.load("a-run").unwrap(), result);
    }

    #[test]
    fn test_load_unknown_tag() {
        let dir = tempdir().unwrap();
        let registry = RunRegistry::new(dir.path());
        assert!(matches!(
            registry.load("ghost"),
            Err(Error::Registry(RegistryError::UnknownTag(_)))
        ));
    }

    #[test]
    fn test_confirmed_overwrite_replaces_file() {
        let dir = tempdir().unwrap();
        let registry = RunRegistry::new(dir.path());
        registry
            .save(&TagDecision::New("t".to_string()), &sample_result())
            .unwrap();

        let mut replacement = BenchmarkResult::new(vec!["orders".to_string()], 1, &Utc::now());
        replacement.record("orders", Some(7));
        registry
            .save(&TagDecision::ConfirmedOverwrite("t".to_string()), &replacement)
            .unwrap();

        assert_eq!(registry.load("t").unwrap().request_names, vec!["orders"]);
    }

    #[test]
    fn test_load_short_series_is_corrupt_run() {
        let dir = tempdir().unwrap();
        let registry = RunRegistry::new(dir.path());
        std::fs::write(
            registry.path_for("short"),
            r#"{ "testDate": "d", "testTime": "t", "iteration": 2, "requests": ["profile"], "profile": [1] }"#,
        )
        .unwrap();

        match registry.load("short") {
            Err(Error::Registry(RegistryError::CorruptRun { tag, reason })) => {
                assert_eq!(tag, "short");
                assert!(reason.contains("'profile' has 1 samples"));
            }
            other => panic!("Expected CorruptRun, got {:?}", other),
        }
    }

    #[test]
    fn test_load_unparsable_file_is_corrupt_run() {
        let dir = tempdir().unwrap();
        let registry = RunRegistry::new(dir.path());
        std::fs::write(registry.path_for("broken"), "{ not json").unwrap();

        assert!(matches!(
            registry.load("broken"),
            Err(Error::Registry(RegistryError::CorruptRun { .. }))
        ));
    }
}
