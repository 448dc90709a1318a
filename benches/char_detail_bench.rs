//! Character detail throughput: resolution against an in-memory dataset and
//! a full parallel directory load.
//!
//! Run with: `cargo bench --bench char_detail`

use std::fs;
use std::path::Path;

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion, Throughput};
use waves_ascension::ascension::{get_char_detail, resolve_char_detail};
use waves_ascension::data::{
    parse_character_record, read_char_json_files, CharacterDataset, CharacterRecord,
    DatasetSnapshot,
};
use waves_ascension::parallel::WorkerPool;

const ELEMENT_NODES: [&str; 6] = [
    "冷凝伤害加成提升",
    "热熔伤害加成提升",
    "导电伤害加成提升",
    "气动伤害加成提升",
    "衍射伤害加成提升",
    "湮灭伤害加成提升",
];

fn character_json(name: &str, element_node: &str) -> String {
    let mut stats = serde_json::Map::new();
    let bands: [(i32, u32, u32); 7] =
        [(0, 1, 20), (1, 20, 40), (2, 40, 50), (3, 50, 60), (4, 60, 70), (5, 70, 80), (6, 80, 90)];
    for (breach, low, high) in bands {
        let rows: serde_json::Map<String, serde_json::Value> = (low..=high)
            .map(|level| {
                let scale = f64::from(level);
                (
                    level.to_string(),
                    serde_json::json!({"life": 120.0 * scale, "atk": 4.0 * scale, "def": 11.0 * scale}),
                )
            })
            .collect();
        stats.insert(breach.to_string(), serde_json::Value::Object(rows));
    }
    serde_json::json!({
        "name": name,
        "starLevel": 5,
        "stats": stats,
        "skillTree": {
            "1": {"skill": {"name": "攻击提升", "type": "属性", "desc": "", "param": ["1.8%"]}},
            "2": {"skill": {"name": "攻击提升", "type": "属性", "desc": "", "param": ["4.2%"]}},
            "3": {"skill": {"name": "暴击提升", "type": "属性", "desc": "", "param": ["1.2%"]}},
            "4": {"skill": {"name": "暴击提升", "type": "属性", "desc": "", "param": ["2.8%"]}},
            "5": {"skill": {"name": element_node, "type": "属性", "desc": "", "param": ["12%"]}},
            "6": {"skill": {
                "name": "固有",
                "type": "固有技能",
                "desc": format!("{name}的攻击提升{{1}}，持续{{2}}秒。"),
                "param": [0, "15%", 8]
            }}
        }
    })
    .to_string()
}

fn record(index: usize) -> CharacterRecord {
    let json = character_json(&format!("角色{index}"), ELEMENT_NODES[index % ELEMENT_NODES.len()]);
    parse_character_record(json.as_bytes()).expect("bench fixture should parse")
}

fn write_dataset(dir: &Path, count: usize) {
    for index in 0..count {
        let json = character_json(&format!("角色{index}"), ELEMENT_NODES[index % ELEMENT_NODES.len()]);
        fs::write(dir.join(format!("{}.json", 1000 + index)), json).expect("fixture should be written");
    }
}

fn bench_resolve(c: &mut Criterion) {
    let single = record(0);
    let dataset = CharacterDataset::from_snapshot(
        "unused",
        DatasetSnapshot::from_records((0..64).map(|i| ((1000 + i).to_string(), record(i)))),
    );

    let mut group = c.benchmark_group("char_detail");
    group.throughput(Throughput::Elements(1));

    group.bench_function("resolve_level_90", |b| {
        b.iter(|| resolve_char_detail(black_box("1000"), &single, black_box(90), None))
    });
    group.bench_function("resolve_level_20", |b| {
        b.iter(|| resolve_char_detail(black_box("1000"), &single, black_box(20), Some(0)))
    });
    group.bench_function("get_char_detail_dataset_64", |b| {
        let mut next = 0usize;
        b.iter(|| {
            next = (next + 1) % 64;
            get_char_detail(&dataset, black_box(1000 + next), 80, None)
        })
    });
    group.finish();
}

fn bench_load(c: &mut Criterion) {
    let tmp = tempfile::tempdir().expect("temp dir should be created");
    write_dataset(tmp.path(), 64);

    let mut group = c.benchmark_group("dataset_load");
    group.sample_size(20);
    group.throughput(Throughput::Elements(64));
    for workers in [1usize, 0] {
        let label = if workers == 0 { "all_cores" } else { "single_thread" };
        group.bench_function(label, |b| {
            b.iter_batched(
                || WorkerPool::with_workers(workers),
                |pool| read_char_json_files(tmp.path(), pool),
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

criterion_group!(benches, bench_resolve, bench_load);
criterion_main!(benches);
