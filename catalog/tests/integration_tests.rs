use std::io::Write;
use std::path::Path;

use routine_import_catalog::{CatalogError, CatalogIndex, MatchTier, load_catalog};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn write_file(dir: &Path, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    let mut f = std::fs::File::create(&path).unwrap();
    f.write_all(contents.as_bytes()).unwrap();
    f.flush().unwrap();
    path
}

const GYM_CATALOG: &str = r#"{
    "79D0BB3A": {"title": "Bench Press (Barbell)"},
    "D04AC939": {"title": "Squat (Barbell)"},
    "C6272009": {"title": "Deadlift (Barbell)"},
    "6A6C31A5": {"title": "Lat Pulldown (Cable)"},
    "F1E57334": {"title": "Seated Cable Row"},
    "A5AC6449": {"title": "Bicep Curl (Dumbbell)"},
    "3601968B": {"title": "Supino Reto"}
}"#;

// ---------------------------------------------------------------------------
// File loading
// ---------------------------------------------------------------------------

#[test]
fn test_load_json_map_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(dir.path(), "catalog.json", GYM_CATALOG);

    let catalog = load_catalog(&path).unwrap();
    assert_eq!(catalog.len(), 7);
    assert_eq!(catalog.get("C6272009").unwrap().name, "Deadlift (Barbell)");
}

#[test]
fn test_load_yaml_list_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(
        dir.path(),
        "catalog.yml",
        "- id: ex1\n  title: Bench Press\n- id: ex2\n  name: Squat\n  primary_muscle_group: quadriceps\n",
    );

    let catalog = load_catalog(&path).unwrap();
    assert_eq!(catalog.len(), 2);
    assert_eq!(
        catalog.get("ex2").unwrap().primary_muscle_group.as_deref(),
        Some("quadriceps")
    );
}

#[test]
fn test_load_api_listing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(
        dir.path(),
        "templates.json",
        r#"{"page": 1, "page_count": 1, "exercise_templates": [
            {"id": "79D0BB3A", "title": "Bench Press (Barbell)", "type": "weight_reps"},
            {"id": "D04AC939", "title": "Squat (Barbell)", "type": "weight_reps"}
        ]}"#,
    );

    let catalog = load_catalog(&path).unwrap();
    assert_eq!(catalog.len(), 2);
    assert!(catalog.get("D04AC939").is_some());
}

#[test]
fn test_load_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_catalog(dir.path().join("nope.json")).unwrap_err();
    assert!(matches!(err, CatalogError::IoError(_)));
}

#[test]
fn test_load_malformed_yaml() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(dir.path(), "broken.yaml", "ex1: [unclosed\n");
    let err = load_catalog(&path).unwrap_err();
    assert!(matches!(err, CatalogError::YamlError(_)));
}

// ---------------------------------------------------------------------------
// Resolution against a loaded catalog
// ---------------------------------------------------------------------------

#[test]
fn test_resolution_tiers_against_loaded_catalog() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(dir.path(), "catalog.json", GYM_CATALOG);
    let index = CatalogIndex::new(&load_catalog(&path).unwrap());
    assert_eq!(index.len(), 7);

    let hit = index.resolve_match("supino reto").unwrap();
    assert_eq!((hit.template_id.as_str(), hit.tier), ("3601968B", MatchTier::Exact));

    let hit = index.resolve_match("Bench Press").unwrap();
    assert_eq!((hit.template_id.as_str(), hit.tier), ("79D0BB3A", MatchTier::Substring));

    let hit = index.resolve_match("Barbell Row").unwrap();
    assert_eq!((hit.template_id.as_str(), hit.tier), ("F1E57334", MatchTier::TokenOverlap));

    assert_eq!(index.resolve("Barbell Hip Thrust"), None);

    assert_eq!(index.resolve("Exercício Inventado XYZ"), None);
}

#[test]
fn test_index_is_shareable_across_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<CatalogIndex>();

    let index = CatalogIndex::from_names([("ex1", "Deadlift"), ("ex2", "Squat")]);
    let index = &index;
    std::thread::scope(|scope| {
        let handles: Vec<_> = ["deadlift", "SQUAT", "Front Squat"]
            .into_iter()
            .map(|name| scope.spawn(move || index.resolve(name)))
            .collect();
        let ids: Vec<Option<String>> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(
            ids,
            vec![
                Some("ex1".to_string()),
                Some("ex2".to_string()),
                Some("ex2".to_string()),
            ]
        );
    });
}
