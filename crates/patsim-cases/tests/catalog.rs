use std::io::Write;

use patsim_cases::CaseCatalog;
use patsim_cases::error::CatalogError;
use patsim_core::models::case::Case;
use rand::SeedableRng;
use rand::rngs::StdRng;

fn case(id: u32, condition: &str) -> Case {
    Case {
        id,
        condition: condition.to_string(),
        symptoms: vec!["Fatigue".to_string()],
        history: "Two weeks".to_string(),
        extra: String::new(),
    }
}

#[test]
fn builtin_catalog_has_reference_cases() {
    let catalog = CaseCatalog::builtin();
    assert_eq!(catalog.len(), 2);
    assert_eq!(catalog.get(1).unwrap().condition, "Migraine");
    assert_eq!(catalog.get(2).unwrap().condition, "Asthma");
    assert!(catalog.get(3).is_none());
}

#[test]
fn pick_case_returns_a_member() {
    let catalog = CaseCatalog::new(vec![case(1, "Anemia"), case(2, "Gout"), case(7, "Flu")]).unwrap();
    let mut rng = StdRng::seed_from_u64(42);

    for _ in 0..50 {
        let picked = catalog.pick_case(&mut rng).unwrap();
        assert!(catalog.iter().any(|c| *c == picked));
    }
}

#[test]
fn pick_case_eventually_covers_every_case() {
    let catalog = CaseCatalog::new(vec![case(1, "Anemia"), case(2, "Gout")]).unwrap();
    let mut rng = StdRng::seed_from_u64(7);

    let mut seen = std::collections::HashSet::new();
    for _ in 0..200 {
        seen.insert(catalog.pick_case(&mut rng).unwrap().id);
    }
    assert_eq!(seen.len(), 2);
}

#[test]
fn empty_catalog_fails_with_configuration_error() {
    let catalog = CaseCatalog::new(Vec::new()).unwrap();
    let mut rng = StdRng::seed_from_u64(1);

    assert!(matches!(catalog.pick_case(&mut rng), Err(CatalogError::Empty)));
    assert!(matches!(catalog.pick_case_random(), Err(CatalogError::Empty)));
}

#[test]
fn duplicate_ids_are_rejected() {
    let result = CaseCatalog::new(vec![case(1, "Anemia"), case(1, "Gout")]);
    assert!(matches!(result, Err(CatalogError::DuplicateId(1))));
}

#[test]
fn loads_catalog_from_json_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"[{{"id":10,"condition":"Appendicitis","symptoms":["Right lower quadrant pain"],"history":"Since last night","extra":"Low-grade fever"}}]"#
    )
    .unwrap();

    let catalog = CaseCatalog::from_json_file(file.path()).unwrap();
    assert_eq!(catalog.len(), 1);
    assert_eq!(catalog.get(10).unwrap().symptoms, vec!["Right lower quadrant pain"]);
}

#[test]
fn empty_json_array_loads_but_cannot_pick() {
    let catalog = CaseCatalog::from_json_str("[]").unwrap();
    assert!(catalog.is_empty());
    assert!(matches!(catalog.pick_case_random(), Err(CatalogError::Empty)));
}

#[test]
fn malformed_json_is_a_parse_error() {
    assert!(matches!(
        CaseCatalog::from_json_str(r#"{"id": 1}"#),
        Err(CatalogError::Parse(_))
    ));
}

#[test]
fn missing_file_is_an_io_error() {
    let result = CaseCatalog::from_json_file(std::path::Path::new("/nonexistent/cases.json"));
    assert!(matches!(result, Err(CatalogError::Io { .. })));
}
