//! Tiered discovery of scenario definitions.
//!
//! Every [`DefinitionSource`] is scanned tier by tier (`core`, then `extended`).
//! Candidates are merged by id:
//! - a core definition always wins over an extended one, whichever is seen first;
//! - two definitions of the same id in the same tier are a hard error and the id
//!   is withheld entirely.
//!
//! Errors never abort the scan. They are collected into a [`DiscoveryReport`] so
//! that a validation run can list every problem at once.

use crate::DEFINITION_FILE;
use crate::error::ScenarioError;
use crate::id::{ScenarioTier, normalize_scenario_id, validate_scenario_folder_name};
use std::collections::{HashMap, HashSet};
use std::io;
use std::path::{Path, PathBuf};

/// Somewhere scenario folders live.
pub trait DefinitionSource: Send + Sync {
    /// Human-readable origin used in diagnostics.
    fn label(&self) -> String;

    /// Immediate scenario folder names of `tier`, sorted.
    ///
    /// `Ok(None)` means the tier does not exist in this source, which is not an error.
    fn folders(&self, tier: ScenarioTier) -> io::Result<Option<Vec<String>>>;

    /// Contents of the folder's definition file, `Ok(None)` if it has none.
    fn read_definition(&self, tier: ScenarioTier, folder: &str) -> io::Result<Option<String>>;
}

/// A `<root>/{core,extended}/<id>/tool.md` tree on disk.
#[derive(Debug, Clone)]
pub struct DirSource {
    root: PathBuf,
}

impl DirSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl DefinitionSource for DirSource {
    fn label(&self) -> String {
        self.root.display().to_string()
    }

    fn folders(&self, tier: ScenarioTier) -> io::Result<Option<Vec<String>>> {
        let tier_dir = self.root.join(tier.as_str());
        if !tier_dir.is_dir() {
            return Ok(None);
        }

        let mut names = Vec::new();
        for entry in std::fs::read_dir(&tier_dir)? {
            let entry = entry?;
            if entry.path().is_dir() {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        names.sort();
        Ok(Some(names))
    }

    fn read_definition(&self, tier: ScenarioTier, folder: &str) -> io::Result<Option<String>> {
        let path = self
            .root
            .join(tier.as_str())
            .join(folder)
            .join(DEFINITION_FILE);
        if !path.is_file() {
            return Ok(None);
        }
        std::fs::read_to_string(path).map(Some)
    }
}

/// Definitions compiled into the binary: `(tier, folder, contents)`.
#[derive(Debug, Clone, Copy)]
pub struct EmbeddedSource {
    label: &'static str,
    entries: &'static [(ScenarioTier, &'static str, &'static str)],
}

impl EmbeddedSource {
    pub const fn new(
        label: &'static str,
        entries: &'static [(ScenarioTier, &'static str, &'static str)],
    ) -> Self {
        Self { label, entries }
    }
}

impl DefinitionSource for EmbeddedSource {
    fn label(&self) -> String {
        self.label.to_string()
    }

    fn folders(&self, tier: ScenarioTier) -> io::Result<Option<Vec<String>>> {
        let mut names: Vec<String> = self
            .entries
            .iter()
            .filter(|(t, _, _)| *t == tier)
            .map(|(_, folder, _)| (*folder).to_string())
            .collect();
        if names.is_empty() {
            return Ok(None);
        }
        names.sort();
        Ok(Some(names))
    }

    fn read_definition(&self, tier: ScenarioTier, folder: &str) -> io::Result<Option<String>> {
        Ok(self
            .entries
            .iter()
            .find(|(t, f, _)| *t == tier && *f == folder)
            .map(|(_, _, raw)| (*raw).to_string()))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DiscoveryOptions {
    /// Slugify folder names before validating them.
    pub normalize_folder_names: bool,
}

/// One definition that survived validation, before parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredScenario {
    pub id: String,
    pub tier: ScenarioTier,
    pub folder: String,
    pub source_label: String,
    pub raw: String,
}

/// Diagnostics collected over a whole scan.
#[derive(Debug, Default)]
pub struct DiscoveryReport {
    pub errors: Vec<ScenarioError>,
    pub warnings: Vec<String>,
}

impl DiscoveryReport {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    fn error(&mut self, err: ScenarioError) {
        tracing::error!("{}", err);
        self.errors.push(err);
    }

    fn warn(&mut self, message: String) {
        tracing::warn!("{}", message);
        self.warnings.push(message);
    }
}

#[derive(Debug, Default)]
pub struct Discovery {
    /// Merged scenarios in first-resolved order.
    pub scenarios: Vec<DiscoveredScenario>,
    pub report: DiscoveryReport,
}

/// Scan every source and merge the results.
///
/// Sources are visited in the given order; within each source `core` is scanned
/// before `extended`.
pub fn discover(sources: &[Box<dyn DefinitionSource>], options: DiscoveryOptions) -> Discovery {
    let mut report = DiscoveryReport::default();
    let mut candidates = Vec::new();

    for source in sources {
        let label = source.label();
        for tier in ScenarioTier::ALL {
            let folders = match source.folders(tier) {
                Ok(Some(folders)) => folders,
                Ok(None) => {
                    tracing::debug!("No {} scenarios in {}", tier, label);
                    continue;
                }
                Err(e) => {
                    report.error(ScenarioError::Io {
                        what: format!("{tier} scenario folders"),
                        source_label: label.clone(),
                        source: e,
                    });
                    continue;
                }
            };

            for folder in folders {
                if let Some(candidate) = load_candidate(
                    source.as_ref(),
                    &label,
                    tier,
                    &folder,
                    options,
                    &mut report,
                ) {
                    candidates.push(candidate);
                }
            }
        }
    }

    let scenarios = merge_candidates(candidates, &mut report);
    tracing::debug!(
        "Discovered {} scenarios ({} errors, {} warnings)",
        scenarios.len(),
        report.errors.len(),
        report.warnings.len()
    );
    Discovery { scenarios, report }
}

fn load_candidate(
    source: &dyn DefinitionSource,
    label: &str,
    tier: ScenarioTier,
    folder: &str,
    options: DiscoveryOptions,
    report: &mut DiscoveryReport,
) -> Option<DiscoveredScenario> {
    let id = if options.normalize_folder_names {
        match normalize_scenario_id(folder) {
            Ok(slug) => slug,
            Err(e) => {
                report.error(e);
                return None;
            }
        }
    } else {
        folder.to_string()
    };

    // Validation logs on its own.
    if let Err(e) = validate_scenario_folder_name(&id) {
        report.errors.push(e);
        return None;
    }

    match source.read_definition(tier, folder) {
        Ok(Some(raw)) => Some(DiscoveredScenario {
            id,
            tier,
            folder: folder.to_string(),
            source_label: label.to_string(),
            raw,
        }),
        Ok(None) => {
            report.error(ScenarioError::MissingDefinition {
                tier,
                folder: folder.to_string(),
                file: DEFINITION_FILE,
            });
            None
        }
        Err(e) => {
            report.error(ScenarioError::Io {
                what: format!("{tier}/{folder}/{DEFINITION_FILE}"),
                source_label: label.to_string(),
                source: e,
            });
            None
        }
    }
}

/// Merge candidates by id, keeping the position of the first occurrence.
pub fn merge_candidates(
    candidates: impl IntoIterator<Item = DiscoveredScenario>,
    report: &mut DiscoveryReport,
) -> Vec<DiscoveredScenario> {
    let mut slots: Vec<Option<DiscoveredScenario>> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut withheld: HashSet<String> = HashSet::new();
    // Every (id, tier) seen so far, including ones that lost to the other tier.
    let mut seen: HashMap<(String, ScenarioTier), String> = HashMap::new();

    for candidate in candidates {
        if withheld.contains(&candidate.id) {
            tracing::debug!(
                "Skipping {} from {}: id already withheld",
                candidate.id,
                candidate.source_label
            );
            continue;
        }

        let key = (candidate.id.clone(), candidate.tier);
        if let Some(first_label) = seen.get(&key) {
            report.error(ScenarioError::DuplicateInTier {
                id: candidate.id.clone(),
                tier: candidate.tier,
                source_label: format!("{} and {}", first_label, candidate.source_label),
            });
            if let Some(&slot) = index.get(&candidate.id) {
                slots[slot] = None;
            }
            withheld.insert(candidate.id);
            continue;
        }
        seen.insert(key, candidate.source_label.clone());

        let Some(&slot) = index.get(&candidate.id) else {
            index.insert(candidate.id.clone(), slots.len());
            slots.push(Some(candidate));
            continue;
        };
        let Some(existing) = slots[slot].as_ref() else {
            continue;
        };

        match (existing.tier, candidate.tier) {
            (ScenarioTier::Core, ScenarioTier::Extended) => {
                report.warn(format!(
                    "Scenario \"{}\" exists in both core and extended. The core version will be used.",
                    candidate.id
                ));
            }
            (ScenarioTier::Extended, ScenarioTier::Core) => {
                report.warn(format!(
                    "Scenario \"{}\" exists in both extended and core. The core version will be used.",
                    candidate.id
                ));
                slots[slot] = Some(candidate);
            }
            // Same tier is caught by `seen` above.
            _ => {}
        }
    }

    slots.into_iter().flatten().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(id: &str, tier: ScenarioTier, label: &str) -> DiscoveredScenario {
        DiscoveredScenario {
            id: id.to_string(),
            tier,
            folder: id.to_string(),
            source_label: label.to_string(),
            raw: format!("{tier} from {label}"),
        }
    }

    #[test]
    fn test_core_then_extended_keeps_core() {
        let mut report = DiscoveryReport::default();
        let merged = merge_candidates(
            vec![
                candidate("x", ScenarioTier::Core, "a"),
                candidate("x", ScenarioTier::Extended, "a"),
            ],
            &mut report,
        );
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].tier, ScenarioTier::Core);
        assert!(report.is_ok());
        assert_eq!(report.warnings.len(), 1);
        assert!(report.warnings[0].contains("The core version will be used."));
    }

    #[test]
    fn test_extended_then_core_replaces_in_place() {
        let mut report = DiscoveryReport::default();
        let merged = merge_candidates(
            vec![
                candidate("x", ScenarioTier::Extended, "a"),
                candidate("y", ScenarioTier::Core, "a"),
                candidate("x", ScenarioTier::Core, "b"),
            ],
            &mut report,
        );
        let ids: Vec<_> = merged.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["x", "y"]);
        assert_eq!(merged[0].tier, ScenarioTier::Core);
        assert_eq!(merged[0].source_label, "b");
        assert!(report.is_ok());
    }

    #[test]
    fn test_same_tier_duplicate_is_withheld() {
        let mut report = DiscoveryReport::default();
        let merged = merge_candidates(
            vec![
                candidate("x", ScenarioTier::Core, "a"),
                candidate("z", ScenarioTier::Core, "a"),
                candidate("x", ScenarioTier::Core, "b"),
                candidate("x", ScenarioTier::Extended, "b"),
            ],
            &mut report,
        );
        let ids: Vec<_> = merged.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["z"]);
        assert!(!report.is_ok());
        assert!(matches!(
            &report.errors[0],
            ScenarioError::DuplicateInTier { id, .. } if id == "x"
        ));
    }

    #[test]
    fn test_same_tier_duplicate_after_core_won_is_withheld() {
        let mut report = DiscoveryReport::default();
        let merged = merge_candidates(
            vec![
                candidate("x", ScenarioTier::Extended, "a"),
                candidate("x", ScenarioTier::Core, "b"),
                candidate("x", ScenarioTier::Extended, "b"),
                candidate("y", ScenarioTier::Extended, "b"),
            ],
            &mut report,
        );
        let ids: Vec<_> = merged.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["y"]);
        assert_eq!(report.errors.len(), 1);
        assert!(matches!(
            &report.errors[0],
            ScenarioError::DuplicateInTier { id, tier: ScenarioTier::Extended, source_label }
                if id == "x" && source_label == "a and b"
        ));
    }

    static ENTRIES: &[(ScenarioTier, &str, &str)] = &[
        (ScenarioTier::Core, "b-one", "## System Prompt\nB"),
        (ScenarioTier::Core, "a-one", "## System Prompt\nA"),
        (ScenarioTier::Extended, "Bad_Name", "## System Prompt\nbad"),
    ];

    #[test]
    fn test_embedded_source_sorted_and_validated() {
        let sources: Vec<Box<dyn DefinitionSource>> =
            vec![Box::new(EmbeddedSource::new("test", ENTRIES))];
        let discovery = discover(&sources, DiscoveryOptions::default());
        let ids: Vec<_> = discovery.scenarios.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["a-one", "b-one"]);
        assert_eq!(discovery.report.errors.len(), 1);
        assert!(matches!(
            discovery.report.errors[0],
            ScenarioError::InvalidFolderName { .. }
        ));
    }

    #[test]
    fn test_normalization_is_opt_in() {
        let sources: Vec<Box<dyn DefinitionSource>> =
            vec![Box::new(EmbeddedSource::new("test", ENTRIES))];
        let discovery = discover(
            &sources,
            DiscoveryOptions {
                normalize_folder_names: true,
            },
        );
        assert!(discovery.report.is_ok());
        let bad = discovery
            .scenarios
            .iter()
            .find(|s| s.id == "bad-name")
            .unwrap();
        assert_eq!(bad.folder, "Bad_Name");
        assert_eq!(bad.tier, ScenarioTier::Extended);
    }
}
