//! Registry of named stat bonuses granted through the skill tree.

/// Skill names that grant a fixed percentage bonus. Order matters: innate
/// skill descriptions are matched against these prefixes in this order.
pub const FIXED_NAME: &[&str] = &[
    "攻击提升",
    "生命提升",
    "防御提升",
    "暴击提升",
    "暴击伤害提升",
    "共鸣效率提升",
    "治疗效果加成提升",
    "冷凝伤害加成提升",
    "热熔伤害加成提升",
    "导电伤害加成提升",
    "气动伤害加成提升",
    "衍射伤害加成提升",
    "湮灭伤害加成提升",
    "全属性伤害加成提升",
];

/// Skill-node type whose description encodes bonuses as `{N}` placeholders.
pub const INNATE_SKILL_TYPE: &str = "固有技能";

pub fn is_fixed_name(name: &str) -> bool {
    FIXED_NAME.contains(&name)
}

/// Canonical bonus key: the registry name with "提升" and "全" removed.
pub fn bonus_key(name: &str) -> String {
    name.replace("提升", "").replace('全', "")
}
