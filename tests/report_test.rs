//! Tests for the report algebra: AND/OR folds, name filtering, rendering

use fence::{FenceError, Outcome, Report, Rule, Value, predicate};
use pretty_assertions::assert_eq;
use serde_json::json;

fn rule(name: &str) -> Rule {
    Rule::new(name, predicate(|_| true), vec![], false).unwrap()
}

fn bool_report(outcomes: &[bool]) -> Report {
    let rules = outcomes.iter().map(|_| rule("check")).collect();
    let outcomes = outcomes.iter().map(|&value| Outcome::Pass(value)).collect();
    Report::new(rules, outcomes, vec![json!("subject")]).unwrap()
}

#[test]
fn for_all_is_the_conjunction_of_plain_outcomes() {
    assert!(bool_report(&[true]).for_all());
    assert!(bool_report(&[true, true, true]).for_all());
    assert!(!bool_report(&[true, false, true]).for_all());
    assert!(!bool_report(&[false]).for_all());
}

#[test]
fn for_any_is_the_disjunction_of_plain_outcomes() {
    assert!(bool_report(&[true]).for_any());
    assert!(bool_report(&[false, false, true]).for_any());
    assert!(!bool_report(&[false, false]).for_any());
}

#[test]
fn construction_rejects_empty_sequences() {
    let err = Report::new(vec![], vec![], vec![]).unwrap_err();
    assert!(err.is_invalid_result());

    let err = Report::new(vec![rule("check")], vec![], vec![]).unwrap_err();
    assert!(err.is_invalid_result());
}

#[test]
fn construction_rejects_mismatched_lengths() {
    let err = Report::new(
        vec![rule("check")],
        vec![Outcome::Pass(true), Outcome::Pass(false)],
        vec![],
    )
    .unwrap_err();
    assert!(matches!(err, FenceError::InvalidResult(_)));
}

#[test]
fn nested_reports_participate_in_for_all() {
    let passing_child = bool_report(&[true, true]);
    let failing_child = bool_report(&[true, false]);

    // Top-level passes, one nested child fails.
    let report = Report::new(
        vec![rule("top"), rule("policy")],
        vec![
            Outcome::Pass(true),
            Outcome::Nested(vec![passing_child.clone(), failing_child]),
        ],
        vec![json!({})],
    )
    .unwrap();
    assert!(!report.for_all());
    assert!(report.for_any());

    // All children pass.
    let report = Report::new(
        vec![rule("top"), rule("policy")],
        vec![
            Outcome::Pass(true),
            Outcome::Nested(vec![passing_child.clone()]),
        ],
        vec![json!({})],
    )
    .unwrap();
    assert!(report.for_all());

    // Top-level fails even though every child passes.
    let report = Report::new(
        vec![rule("top"), rule("policy")],
        vec![Outcome::Pass(false), Outcome::Nested(vec![passing_child])],
        vec![json!({})],
    )
    .unwrap();
    assert!(!report.for_all());
}

#[test]
fn nested_reports_participate_in_for_any() {
    let all_failing = bool_report(&[false, false]);
    let one_passing = bool_report(&[false, true]);

    let report = Report::new(
        vec![rule("top"), rule("policy")],
        vec![Outcome::Pass(false), Outcome::Nested(vec![all_failing])],
        vec![json!({})],
    )
    .unwrap();
    assert!(!report.for_any());

    let report = Report::new(
        vec![rule("top"), rule("policy")],
        vec![Outcome::Pass(false), Outcome::Nested(vec![one_passing])],
        vec![json!({})],
    )
    .unwrap();
    assert!(report.for_any());
}

#[test]
fn for_one_filters_by_name_preserving_order() {
    let rules = vec![rule("length"), rule("charset"), rule("length")];
    let outcomes = vec![
        Outcome::Pass(true),
        Outcome::Pass(false),
        Outcome::Pass(false),
    ];
    let report = Report::new(rules, outcomes, vec![json!("abc")]).unwrap();

    assert_eq!(
        report.for_one("length").unwrap(),
        vec![Outcome::Pass(true), Outcome::Pass(false)]
    );
    assert_eq!(report.for_one("charset").unwrap(), vec![Outcome::Pass(false)]);
    assert_eq!(report.for_one("unknown").unwrap(), vec![]);
}

#[test]
fn for_one_rejects_an_empty_name() {
    let report = bool_report(&[true]);
    let err = report.for_one("").unwrap_err();
    assert!(matches!(err, FenceError::InvalidArgument(_)));

    let err = report.for_one("   ").unwrap_err();
    assert!(matches!(err, FenceError::InvalidArgument(_)));
}

#[test]
fn explain_lists_rules_in_outcome_order() {
    let labelled = Rule::new("minLength", predicate(|_| false), vec![json!(4)], false).unwrap();
    let report = Report::new(
        vec![rule("required"), labelled],
        vec![Outcome::Pass(true), Outcome::Pass(false)],
        vec![json!("abc")],
    )
    .unwrap();

    let mut sink = Vec::new();
    report.explain(&mut sink, "  ").unwrap();
    let rendered = String::from_utf8(sink).unwrap();

    let required_at = rendered.find("required").unwrap();
    let min_length_at = rendered.find("minLength").unwrap();
    assert!(required_at < min_length_at);

    // Bound arguments show up in the rule label.
    assert!(rendered.contains("minLength ([4])"));
    assert!(rendered.contains("subject: [\"abc\"]"));
    assert!(rendered.contains("[x] forAll"));
    assert!(rendered.contains("[✓] forAny"));
}
