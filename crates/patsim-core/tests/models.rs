use patsim_core::models::case::Case;
use patsim_core::models::evaluation::{EvaluationReport, ScoreBand, SectionKind};
use patsim_core::models::message::{Message, Role};
use patsim_core::models::mode::Mode;

#[test]
fn mode_parses_only_the_two_wire_values() {
    assert_eq!("chat".parse::<Mode>().unwrap(), Mode::Chat);
    assert_eq!("evaluate".parse::<Mode>().unwrap(), Mode::Evaluate);
    assert!("bogus".parse::<Mode>().is_err());
    assert!("Chat".parse::<Mode>().is_err());
    assert!("".parse::<Mode>().is_err());
}

#[test]
fn message_serializes_with_lowercase_role() {
    let json = serde_json::to_value(Message::user("Where does it hurt?")).unwrap();
    assert_eq!(json["role"], "user");
    assert_eq!(json["content"], "Where does it hurt?");

    let back: Message =
        serde_json::from_str(r#"{"role":"assistant","content":"My head."}"#).unwrap();
    assert_eq!(back.role, Role::Assistant);
}

#[test]
fn case_extra_defaults_to_empty() {
    let case: Case = serde_json::from_str(
        r#"{"id":3,"condition":"Gout","symptoms":["Toe pain"],"history":"Sudden onset"}"#,
    )
    .unwrap();
    assert_eq!(case.extra, "");
}

#[test]
fn presenting_view_omits_condition() {
    let case = Case {
        id: 1,
        condition: "Migraine".to_string(),
        symptoms: vec!["Severe headache".to_string()],
        history: "Three days".to_string(),
        extra: "No fever".to_string(),
    };
    let json = serde_json::to_string(&case.presenting()).unwrap();
    assert!(!json.contains("Migraine"));
    assert!(json.contains("Severe headache"));
}

#[test]
fn score_band_boundaries() {
    assert_eq!(ScoreBand::for_score(0), ScoreBand::Poor);
    assert_eq!(ScoreBand::for_score(4), ScoreBand::Poor);
    assert_eq!(ScoreBand::for_score(5), ScoreBand::Fair);
    assert_eq!(ScoreBand::for_score(6), ScoreBand::Fair);
    assert_eq!(ScoreBand::for_score(7), ScoreBand::Good);
    assert_eq!(ScoreBand::for_score(10), ScoreBand::Good);
}

#[test]
fn absent_score_has_no_band() {
    let report = EvaluationReport::default();
    assert_eq!(report.score_band(), None);

    let zero = EvaluationReport {
        score: Some(0),
        ..Default::default()
    };
    assert_eq!(zero.score_band(), Some(ScoreBand::Poor));
}

#[test]
fn empty_lists_produce_no_sections() {
    let report = EvaluationReport {
        score: Some(6),
        strengths: vec![],
        missing: vec!["no family history".to_string()],
        feedback: vec![],
        condition: None,
    };

    let sections = report.sections();
    assert_eq!(sections.len(), 1);
    assert_eq!(sections[0].kind, SectionKind::Missing);
    assert_eq!(sections[0].items.len(), 1);

    assert!(EvaluationReport::default().sections().is_empty());
    assert!(EvaluationReport::default().is_empty());
}
