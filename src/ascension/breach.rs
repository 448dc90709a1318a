//! Breach (ascension tier) selection from character level.

use std::ops::RangeInclusive;

/// Level cap of each breach tier; index = breach.
pub const BREACH_LEVEL_CAPS: [u32; 7] = [20, 40, 50, 60, 70, 80, 90];

/// Breach tier at which named stat nodes in the skill tree become active.
pub const FIXED_SKILL_MIN_BREACH: i32 = 3;

/// Resolve the breach tier used for a stats lookup.
///
/// An explicit `breach` always wins, whatever its value. Otherwise the tier is
/// derived from `level` using [BREACH_LEVEL_CAPS]. Levels above the last cap
/// fall back to tier 0; existing callers rely on that, see DESIGN.md.
pub fn get_breach(breach: Option<i32>, level: u32) -> i32 {
    if let Some(breach) = breach {
        return breach;
    }
    BREACH_LEVEL_CAPS
        .iter()
        .position(|&cap| level <= cap)
        .map_or(0, |tier| tier as i32)
}

/// Levels a character can have while sitting at `breach`: from the previous
/// tier's cap (or 1) up to this tier's cap. `None` for tiers outside 0..=6.
pub fn level_band(breach: i32) -> Option<RangeInclusive<u32>> {
    let tier = usize::try_from(breach).ok()?;
    let cap = *BREACH_LEVEL_CAPS.get(tier)?;
    let floor = match tier {
        0 => 1,
        _ => BREACH_LEVEL_CAPS[tier - 1],
    };
    Some(floor..=cap)
}
