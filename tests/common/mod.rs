#![allow(dead_code)]

use std::fs;
use std::path::Path;

/// Level rows for every breach tier, covering both ends of each band.
fn stats_table(base_atk: f64) -> serde_json::Value {
    let mut stats = serde_json::Map::new();
    let bands: [(u32, &[u32]); 7] = [
        (0, &[1, 20]),
        (1, &[20, 40]),
        (2, &[40, 50]),
        (3, &[50, 60]),
        (4, &[60, 70]),
        (5, &[70, 80]),
        (6, &[80, 90]),
    ];
    for (breach, levels) in bands {
        let mut rows = serde_json::Map::new();
        for &level in levels {
            let scale = f64::from(level);
            rows.insert(
                level.to_string(),
                serde_json::json!({
                    "life": 100.0 * scale,
                    "atk": base_atk * scale,
                    "def": 10.0 * scale,
                    "critRate": 5.0
                }),
            );
        }
        stats.insert(breach.to_string(), serde_json::Value::Object(rows));
    }
    serde_json::Value::Object(stats)
}

/// A character with two atk nodes, one element node and an innate skill that
/// names its bonus through a `{1}` placeholder.
pub fn character_json(name: &str, element_node: &str) -> String {
    serde_json::json!({
        "name": name,
        "starLevel": 5,
        "stats": stats_table(3.0),
        "statsWeakness": {
            "weaknessBuildUp": 0,
            "weaknessBuildUpMax": 10000,
            "weaknessTotalBonus": 0,
            "breakWeaknessRatio": 10000,
            "weaknessMastery": 0
        },
        "skillTree": {
            "1": {"skill": {"name": "攻击提升", "type": "属性", "desc": "攻击提升1.8%", "param": ["1.8%"]}},
            "2": {"skill": {"name": "攻击提升", "type": "属性", "desc": "攻击提升4.2%", "param": ["4.2%"]}},
            "3": {"skill": {"name": element_node, "type": "属性", "desc": "", "param": ["12%"]}},
            "4": {"skill": {
                "name": "固有",
                "type": "固有技能",
                "desc": format!("{name}的攻击提升{{1}}，持续{{2}}秒。"),
                "param": [0, "15%", 8]
            }}
        }
    })
    .to_string()
}

pub fn write_character(dir: &Path, char_id: &str, body: &str) {
    fs::create_dir_all(dir).expect("fixture dir should be created");
    fs::write(dir.join(format!("{char_id}.json")), body).expect("fixture should be written");
}

/// Three well-formed characters (one nested) plus one malformed file.
pub fn seed_dataset(dir: &Path) {
    write_character(dir, "1205", &character_json("长离", "热熔伤害加成提升"));
    write_character(dir, "1102", &character_json("散华", "冷凝伤害加成提升"));
    write_character(&dir.join("nested"), "1503", &character_json("维里奈", "衍射伤害加成提升"));
    write_character(dir, "broken", "{ \"name\": ");
}
