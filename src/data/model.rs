//! Typed character view handed to rendering and damage-calculation code.

use std::sync::Arc;

use serde::Serialize;

use crate::data::character::{CharStats, CharacterRecord, Skill, SkillTree, StatsTable, StatsWeakness};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterModel {
    pub id: String,
    pub name: String,
    pub star_level: u8,
    pub stats: StatsTable,
    pub stats_weakness: StatsWeakness,
    pub skill_tree: Arc<SkillTree>,
}

impl CharacterModel {
    pub fn from_record(id: impl Into<String>, record: &CharacterRecord) -> Self {
        Self {
            id: id.into(),
            name: record.name.clone(),
            star_level: record.star_level,
            stats: record.stats.clone(),
            stats_weakness: record.stats_weakness.clone(),
            skill_tree: Arc::clone(&record.skill_tree),
        }
    }

    /// Highest breach tier with at least one stats row.
    pub fn max_breach(&self) -> Option<i32> {
        self.stats
            .iter()
            .rev()
            .find(|(_, levels)| !levels.is_empty())
            .map(|(breach, _)| *breach)
    }

    /// Highest level present at any breach tier.
    pub fn max_level(&self) -> Option<u32> {
        self.stats
            .values()
            .filter_map(|levels| levels.keys().next_back().copied())
            .max()
    }

    pub fn stats_at(&self, breach: i32, level: u32) -> Option<&CharStats> {
        self.stats.get(&breach)?.get(&level)
    }

    pub fn skill(&self, name: &str) -> Option<&Skill> {
        self.skill_tree
            .values()
            .map(|node| &node.skill)
            .find(|skill| skill.name == name)
    }

    pub fn innate_skills(&self) -> impl Iterator<Item = &Skill> {
        self.skill_tree
            .values()
            .map(|node| &node.skill)
            .filter(|skill| skill.is_innate())
    }
}
