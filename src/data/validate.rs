use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use serde::Serialize;

use crate::ascension::{
    innate_bonuses, is_fixed_name, level_band, lookup_param, ParamLookup, BREACH_LEVEL_CAPS,
};
use crate::data::character::{load_character_record, CharacterRecord};
use crate::data::dataset::{char_id_from_path, collect_json_paths};
use crate::data::DatasetError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationSeverity {
    Error,
    Warning,
    Info,
}

impl ValidationSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }
}

impl fmt::Display for ValidationSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationDiagnostic {
    pub severity: ValidationSeverity,
    pub context: String,
    pub message: String,
}

impl fmt::Display for ValidationDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.severity, self.context, self.message)
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationReport {
    pub checked: usize,
    pub diagnostics: Vec<ValidationDiagnostic>,
}

impl ValidationReport {
    pub fn push(
        &mut self,
        severity: ValidationSeverity,
        context: impl Into<String>,
        message: impl Into<String>,
    ) {
        self.diagnostics.push(ValidationDiagnostic {
            severity,
            context: context.into(),
            message: message.into(),
        });
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|diag| diag.severity == ValidationSeverity::Error)
    }

    pub fn count(&self, severity: ValidationSeverity) -> usize {
        self.diagnostics
            .iter()
            .filter(|diag| diag.severity == severity)
            .count()
    }
}

/// Check every character file under `dir` for problems that would make
/// detail resolution fail or silently drop a bonus.
pub fn validate_character_dataset(dir: impl AsRef<Path>) -> Result<ValidationReport, DatasetError> {
    let dir = dir.as_ref();
    if !dir.is_dir() {
        return Err(DatasetError::MissingDirectory(dir.to_path_buf()));
    }

    let (paths, unreadable) = collect_json_paths(dir);
    let mut report = ValidationReport::default();
    for entry in unreadable {
        report.push(
            ValidationSeverity::Error,
            entry.path.display().to_string(),
            entry.reason,
        );
    }

    let mut first_by_name: HashMap<String, String> = HashMap::new();
    for path in paths {
        report.checked += 1;
        let context = path
            .strip_prefix(dir)
            .unwrap_or(&path)
            .display()
            .to_string();
        let Some(char_id) = char_id_from_path(&path) else {
            report.push(ValidationSeverity::Error, context, "file name does not yield a character id");
            continue;
        };
        let record = match load_character_record(&path) {
            Ok(record) => record,
            Err(err) => {
                report.push(ValidationSeverity::Error, context, err.to_string());
                continue;
            }
        };

        let context = format!("{context} id='{char_id}'");
        if record.name.trim().is_empty() {
            report.push(ValidationSeverity::Error, format!("{context}.name"), "missing non-empty 'name'");
        } else if let Some(first) = first_by_name.get(&record.name) {
            report.push(
                ValidationSeverity::Warning,
                format!("{context}.name"),
                format!("name '{}' already used by id '{first}'; exact lookup returns the first", record.name),
            );
        } else {
            first_by_name.insert(record.name.clone(), char_id.clone());
        }

        validate_stats(&mut report, &context, &record);
        validate_skills(&mut report, &context, &record);
    }

    Ok(report)
}

fn validate_stats(report: &mut ValidationReport, context: &str, record: &CharacterRecord) {
    let rows: usize = record.stats.values().map(|levels| levels.len()).sum();
    if rows == 0 {
        report.push(ValidationSeverity::Error, format!("{context}.stats"), "no stats rows");
        return;
    }

    for (breach, levels) in &record.stats {
        let breach_context = format!("{context}.stats[{breach}]");
        let Some(band) = level_band(*breach) else {
            report.push(
                ValidationSeverity::Warning,
                breach_context,
                format!("breach outside 0..={}", BREACH_LEVEL_CAPS.len() - 1),
            );
            continue;
        };
        for level in levels.keys() {
            if !band.contains(level) {
                report.push(
                    ValidationSeverity::Warning,
                    format!("{breach_context}[{level}]"),
                    format!("level outside breach band {}..={}", band.start(), band.end()),
                );
            }
        }
    }
}

fn validate_skills(report: &mut ValidationReport, context: &str, record: &CharacterRecord) {
    for (slot, node) in record.skill_tree.iter() {
        let skill = &node.skill;
        let skill_context = format!("{context}.skillTree[{slot}]");

        if is_fixed_name(&skill.name) {
            push_param_issue(report, &skill_context, &skill.name, lookup_param(&skill.param, 0));
        }

        if skill.is_innate() {
            let bonuses = innate_bonuses(&record.name, skill);
            if bonuses.is_empty() {
                report.push(
                    ValidationSeverity::Info,
                    skill_context.clone(),
                    format!("innate skill '{}' grants no registry bonus", skill.name),
                );
            }
            for bonus in bonuses {
                push_param_issue(
                    report,
                    &skill_context,
                    bonus.name,
                    lookup_param(&skill.param, bonus.param_index),
                );
            }
        }
    }
}

fn push_param_issue(report: &mut ValidationReport, context: &str, bonus: &str, lookup: ParamLookup) {
    match lookup {
        ParamLookup::Found(_) => {}
        ParamLookup::OutOfRange { index, len } => report.push(
            ValidationSeverity::Warning,
            format!("{context}.param[{index}]"),
            format!("'{bonus}' refers to param {index} but only {len} present"),
        ),
        ParamLookup::WrongType { index, value } => report.push(
            ValidationSeverity::Warning,
            format!("{context}.param[{index}]"),
            format!("'{bonus}' param {value:?} is not a percentage"),
        ),
    }
}
