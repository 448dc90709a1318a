//! Character stat resolution for Wuthering Waves.
//!
//! Loads the per-character JSON dataset ([data::CharacterDataset]) and resolves
//! levelled stats plus fixed-skill bonuses for a `(char_id, level, breach)`
//! triple ([ascension::get_char_detail]).

pub mod ascension;
pub mod cli;
pub mod config;
pub mod data;
pub mod logging;
pub mod parallel;
