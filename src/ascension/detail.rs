//! Character detail resolution: levelled stats for a (breach, level) pair plus
//! the fixed-skill percentage bonuses unlocked through the skill tree.

use std::collections::BTreeMap;
use std::fmt::Display;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::ascension::breach::{get_breach, FIXED_SKILL_MIN_BREACH};
use crate::ascension::constant::{bonus_key, is_fixed_name, FIXED_NAME};
use crate::ascension::percent::Percent;
use crate::ascension::skill_desc::extract_param_index;
use crate::data::{CharStats, CharacterDataset, CharacterRecord, ParamValue, Skill, SkillTree, StatsWeakness};

pub const DEFAULT_STAR_LEVEL: u8 = 4;

/// Resolved snapshot of one character at one level. Owned by the caller;
/// `stats` and `stats_weakness` are independent copies of the dataset values.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WavesCharResult {
    pub name: String,
    pub star_level: u8,
    pub stats: CharStats,
    pub stats_weakness: StatsWeakness,
    /// Shared with the dataset record; read-only.
    pub skill_trees: Arc<SkillTree>,
    /// Bonus key -> accumulated percentage.
    #[serde(rename = "fixed_skill")]
    pub fixed_skill: BTreeMap<String, Percent>,
}

impl Default for WavesCharResult {
    fn default() -> Self {
        Self {
            name: String::new(),
            star_level: DEFAULT_STAR_LEVEL,
            stats: CharStats::default(),
            stats_weakness: StatsWeakness::default(),
            skill_trees: Arc::default(),
            fixed_skill: BTreeMap::new(),
        }
    }
}

impl WavesCharResult {
    /// Formatted bonus, e.g. `"12.5%"`.
    pub fn fixed_skill_percent(&self, key: &str) -> Option<String> {
        self.fixed_skill.get(key).map(Percent::to_string)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CharDetailError {
    #[error("character {char_id} has no stats row for breach {breach} level {level}")]
    StatsNotFound {
        char_id: String,
        breach: i32,
        level: u32,
    },
}

/// Outcome of reading one skill param as a percentage.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamLookup {
    Found(Percent),
    OutOfRange { index: usize, len: usize },
    WrongType { index: usize, value: ParamValue },
}

pub fn lookup_param(params: &[ParamValue], index: usize) -> ParamLookup {
    match params.get(index) {
        None => ParamLookup::OutOfRange {
            index,
            len: params.len(),
        },
        Some(value) => match value.as_percent() {
            Some(percent) => ParamLookup::Found(percent),
            None => ParamLookup::WrongType {
                index,
                value: value.clone(),
            },
        },
    }
}

/// A registry bonus named at the start of an innate skill description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InnateBonus {
    /// Registry name, e.g. `攻击提升`.
    pub name: &'static str,
    /// Canonical key, e.g. `攻击`.
    pub key: String,
    /// Prefix that matched: the name itself or `<character>的<name>`.
    pub pattern: String,
    pub param_index: usize,
}

/// Registry bonuses an innate skill description starts with, in registry order.
pub fn innate_bonuses(char_name: &str, skill: &Skill) -> Vec<InnateBonus> {
    FIXED_NAME
        .iter()
        .filter_map(|&name| {
            let pattern = if skill.desc.starts_with(name) {
                name.to_string()
            } else {
                let prefixed = format!("{char_name}的{name}");
                if !skill.desc.starts_with(&prefixed) {
                    return None;
                }
                prefixed
            };
            Some(InnateBonus {
                name,
                key: bonus_key(name),
                param_index: extract_param_index(&skill.desc, &pattern),
                pattern,
            })
        })
        .collect()
}

/// Role fields as reported by the account API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleSummary {
    pub role_id: i64,
    pub level: u32,
    #[serde(default)]
    pub breach: Option<i32>,
}

/// Resolve a character snapshot from the dataset.
///
/// Unknown ids are logged and yield [WavesCharResult::default]. A known id
/// without a stats row for the resolved (breach, level) is an error.
pub fn get_char_detail(
    dataset: &CharacterDataset,
    char_id: impl Display,
    level: u32,
    breach: Option<i32>,
) -> Result<WavesCharResult, CharDetailError> {
    let char_id = char_id.to_string();
    let Some(record) = dataset.lookup(&char_id) else {
        warn!(char_id = %char_id, "get_char_detail: character not found");
        return Ok(WavesCharResult::default());
    };
    resolve_char_detail(&char_id, &record, level, breach)
}

pub fn get_char_detail_for_role(
    dataset: &CharacterDataset,
    role: &RoleSummary,
) -> Result<WavesCharResult, CharDetailError> {
    get_char_detail(dataset, role.role_id, role.level, role.breach)
}

/// Resolve against a single record, without touching the dataset.
pub fn resolve_char_detail(
    char_id: &str,
    record: &CharacterRecord,
    level: u32,
    breach: Option<i32>,
) -> Result<WavesCharResult, CharDetailError> {
    let breach = get_breach(breach, level);
    let stats = record
        .stats_for(breach, level)
        .cloned()
        .ok_or_else(|| CharDetailError::StatsNotFound {
            char_id: char_id.to_string(),
            breach,
            level,
        })?;

    let mut fixed_skill: BTreeMap<String, Percent> = BTreeMap::new();
    for skill in record.skills() {
        if breach >= FIXED_SKILL_MIN_BREACH && is_fixed_name(&skill.name) {
            let total = fixed_skill.entry(bonus_key(&skill.name)).or_default();
            accumulate(total, lookup_param(&skill.param, 0), char_id, &skill.name);
        }

        if skill.is_innate() {
            for bonus in innate_bonuses(&record.name, skill) {
                let total = fixed_skill.entry(bonus.key).or_default();
                accumulate(
                    total,
                    lookup_param(&skill.param, bonus.param_index),
                    char_id,
                    bonus.name,
                );
            }
        }
    }

    debug!(char_id, breach, level, bonuses = fixed_skill.len(), "resolved character detail");
    Ok(WavesCharResult {
        name: record.name.clone(),
        star_level: record.star_level,
        stats,
        stats_weakness: record.stats_weakness.clone(),
        skill_trees: Arc::clone(&record.skill_tree),
        fixed_skill,
    })
}

/// Add a param to a running total; bad params skip only this contribution.
fn accumulate(total: &mut Percent, lookup: ParamLookup, char_id: &str, skill: &str) {
    match lookup {
        ParamLookup::Found(value) => *total += value,
        ParamLookup::OutOfRange { index, len } => {
            warn!(char_id, skill, index, len, "skill param index out of range; bonus skipped");
        }
        ParamLookup::WrongType { index, value } => {
            warn!(char_id, skill, index, ?value, "skill param is not a percentage; bonus skipped");
        }
    }
}
