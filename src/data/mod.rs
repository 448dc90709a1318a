//! Character dataset: record schema, loader service, typed model view and validation.

pub mod character;
pub mod dataset;
pub mod model;
pub mod validate;

use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub use character::{
    load_character_record, parse_character_record, CharStats, CharacterRecord, ParamValue, Skill,
    SkillNode, SkillTree, StatsTable, StatsWeakness,
};
pub use dataset::{
    read_char_json_files, CharacterDataset, DatasetSnapshot, LoadReport, SkippedFile,
    DEFAULT_CHAR_DATA_DIR,
};
pub use model::CharacterModel;
pub use validate::{
    validate_character_dataset, ValidationDiagnostic, ValidationReport, ValidationSeverity,
};

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("failed to read {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to decode character record {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to walk dataset directory: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("dataset directory {0:?} does not exist")]
    MissingDirectory(PathBuf),
}
