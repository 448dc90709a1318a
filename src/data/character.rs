//! Per-character record schema. One JSON document per character, named `<id>.json`.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize};

use crate::ascension::constant::INNATE_SKILL_TYPE;
use crate::ascension::Percent;
use crate::data::DatasetError;

/// breach tier -> level -> attributes. JSON keys are string-encoded integers.
pub type StatsTable = BTreeMap<i32, BTreeMap<u32, CharStats>>;

/// Skill slot key -> node.
pub type SkillTree = BTreeMap<String, SkillNode>;

/// Levelled attributes for one (breach, level) row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CharStats {
    #[serde(default)]
    pub life: f64,
    #[serde(default)]
    pub atk: f64,
    #[serde(default)]
    pub def: f64,
    /// Any further numeric attributes present in the row.
    #[serde(flatten)]
    pub extra: BTreeMap<String, f64>,
}

impl CharStats {
    pub fn get(&self, attribute: &str) -> Option<f64> {
        match attribute {
            "life" => Some(self.life),
            "atk" => Some(self.atk),
            "def" => Some(self.def),
            other => self.extra.get(other).copied(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StatsWeakness {
    pub weakness_build_up: f64,
    pub weakness_build_up_max: f64,
    pub weakness_total_bonus: f64,
    pub break_weakness_ratio: f64,
    pub weakness_mastery: f64,
}

impl Default for StatsWeakness {
    fn default() -> Self {
        Self {
            weakness_build_up: 0.0,
            weakness_build_up_max: 10_000.0,
            weakness_total_bonus: 0.0,
            break_weakness_ratio: 10_000.0,
            weakness_mastery: 0.0,
        }
    }
}

/// A skill param: a bare number or a formatted string such as `"15%"`.
/// Anything else (nested multiplier lists, booleans, null) is kept as
/// [ParamValue::Other] and never reads as a percentage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Number(f64),
    Text(String),
    Other(serde_json::Value),
}

impl ParamValue {
    /// Percentage reading of this param; `None` for text that is not a number
    /// and for non-scalar values.
    pub fn as_percent(&self) -> Option<Percent> {
        match self {
            ParamValue::Number(value) => Percent::from_f64(*value),
            ParamValue::Text(raw) => raw.parse().ok(),
            ParamValue::Other(_) => None,
        }
    }
}

/// `"param": null` reads as an empty list.
fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<ParamValue>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<ParamValue>>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Skill {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub skill_type: String,
    #[serde(default)]
    pub desc: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub param: Vec<ParamValue>,
}

impl Skill {
    pub fn is_innate(&self) -> bool {
        self.skill_type == INNATE_SKILL_TYPE
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SkillNode {
    #[serde(default)]
    pub skill: Skill,
}

/// Static data for one character, validated against this schema at load time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterRecord {
    pub name: String,
    pub star_level: u8,
    pub stats: StatsTable,
    #[serde(default)]
    pub stats_weakness: StatsWeakness,
    #[serde(default)]
    pub skill_tree: Arc<SkillTree>,
}

impl CharacterRecord {
    pub fn stats_for(&self, breach: i32, level: u32) -> Option<&CharStats> {
        self.stats.get(&breach)?.get(&level)
    }

    pub fn skills(&self) -> impl Iterator<Item = &Skill> {
        self.skill_tree.values().map(|node| &node.skill)
    }
}

pub fn parse_character_record(raw: &[u8]) -> Result<CharacterRecord, serde_json::Error> {
    serde_json::from_slice(raw)
}

/// Load a single character record from disk.
pub fn load_character_record(path: impl AsRef<Path>) -> Result<CharacterRecord, DatasetError> {
    let path = path.as_ref();
    let raw = fs::read(path).map_err(|source| DatasetError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_character_record(&raw).map_err(|source| DatasetError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
