mod common;

use std::fs;

use waves_ascension::data::CharacterDataset;
use waves_ascension::parallel::WorkerPool;

use common::{character_json, seed_dataset, write_character};

#[test]
fn malformed_file_is_skipped_and_rest_are_loaded() {
    let tmp = tempfile::tempdir().unwrap();
    write_character(tmp.path(), "1102", &character_json("散华", "冷凝伤害加成提升"));
    write_character(tmp.path(), "1103", "not json at all");

    let dataset = CharacterDataset::new(tmp.path());
    dataset.ensure_loaded(false);

    let snapshot = dataset.snapshot();
    assert!(dataset.is_loaded());
    assert_eq!(snapshot.ids().collect::<Vec<_>>(), ["1102"]);
    assert_eq!(snapshot.report().loaded, 1);
    assert_eq!(snapshot.report().skipped.len(), 1);
    assert!(snapshot.report().skipped[0].path.ends_with("1103.json"));
}

#[test]
fn nested_directories_are_scanned_in_sorted_order() {
    let tmp = tempfile::tempdir().unwrap();
    seed_dataset(tmp.path());

    let dataset = CharacterDataset::new(tmp.path()).with_workers(WorkerPool::with_workers(2));
    let snapshot = dataset.load().unwrap();
    assert_eq!(snapshot.ids().collect::<Vec<_>>(), ["1102", "1205", "1503"]);
    assert!(snapshot.report().loaded_at.is_some());
    assert_eq!(snapshot.report().fingerprint.len(), 64);
}

#[test]
fn loading_without_force_does_not_touch_disk_again() {
    let tmp = tempfile::tempdir().unwrap();
    seed_dataset(tmp.path());
    let dataset = CharacterDataset::new(tmp.path());
    dataset.ensure_loaded(false);
    assert_eq!(dataset.snapshot().len(), 3);

    write_character(tmp.path(), "1301", &character_json("卡卡罗", "导电伤害加成提升"));
    fs::remove_file(tmp.path().join("1102.json")).unwrap();
    dataset.ensure_loaded(false);

    let snapshot = dataset.snapshot();
    assert_eq!(snapshot.len(), 3);
    assert!(snapshot.contains("1102"));
    assert!(!snapshot.contains("1301"));
}

#[test]
fn forced_reload_replaces_snapshot_and_reports_change() {
    let tmp = tempfile::tempdir().unwrap();
    seed_dataset(tmp.path());
    let dataset = CharacterDataset::new(tmp.path());
    let before = dataset.snapshot();

    assert!(!dataset.reload().unwrap(), "unchanged directory keeps fingerprint");

    write_character(tmp.path(), "1301", &character_json("卡卡罗", "导电伤害加成提升"));
    assert!(dataset.reload().unwrap());

    let after = dataset.snapshot();
    assert!(after.contains("1301"));
    assert!(!before.contains("1301"), "held snapshots are never mutated");
}

#[test]
fn reload_of_missing_directory_keeps_previous_snapshot() {
    let tmp = tempfile::tempdir().unwrap();
    let dir = tmp.path().join("char");
    seed_dataset(&dir);
    let dataset = CharacterDataset::new(&dir);
    assert_eq!(dataset.snapshot().len(), 3);

    fs::remove_dir_all(&dir).unwrap();
    assert!(dataset.reload().is_err());
    assert_eq!(dataset.snapshot().len(), 3);
}

#[test]
fn exact_lookup_does_not_fall_back_to_loose() {
    let tmp = tempfile::tempdir().unwrap();
    seed_dataset(tmp.path());
    let dataset = CharacterDataset::new(tmp.path());

    assert_eq!(dataset.get_char_id("长离", false).as_deref(), Some("1205"));
    assert_eq!(dataset.get_char_id("长", false), None);
    assert_eq!(dataset.get_char_id("长", true).as_deref(), Some("1205"));
    assert_eq!(dataset.get_char_id("维里奈·光", true).as_deref(), Some("1503"));
    assert_eq!(dataset.get_char_id("今汐", true), None);
}

#[test]
fn char_model_is_typed_view_or_absent() {
    let tmp = tempfile::tempdir().unwrap();
    seed_dataset(tmp.path());
    let dataset = CharacterDataset::new(tmp.path());

    let model = dataset.get_char_model(1102).expect("known id");
    assert_eq!(model.id, "1102");
    assert_eq!(model.name, "散华");
    assert_eq!(model.max_breach(), Some(6));
    assert_eq!(model.max_level(), Some(90));
    assert_eq!(model.innate_skills().count(), 1);

    assert!(dataset.get_char_model("9999").is_none());
}
