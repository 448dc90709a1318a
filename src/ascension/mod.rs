//! Ascension: breach selection, fixed-skill bonus extraction and the
//! character detail resolver built on top of them.

pub mod breach;
pub mod constant;
pub mod detail;
pub mod percent;
pub mod skill_desc;

pub use breach::{get_breach, level_band, BREACH_LEVEL_CAPS, FIXED_SKILL_MIN_BREACH};
pub use constant::{bonus_key, is_fixed_name, FIXED_NAME, INNATE_SKILL_TYPE};
pub use detail::{
    get_char_detail, get_char_detail_for_role, innate_bonuses, lookup_param, resolve_char_detail,
    CharDetailError, InnateBonus, ParamLookup, RoleSummary, WavesCharResult,
};
pub use percent::{sum_percentages, Percent, PercentParseError};
pub use skill_desc::{extract_param_index, PLACEHOLDER_WINDOW};
