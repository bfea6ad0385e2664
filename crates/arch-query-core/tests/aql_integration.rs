//! Integration test: AQL end-to-end, from source text to violations.
//!
//! Exercises the full pipeline — statement parsing, pattern grammar,
//! matchers, metric extraction — the way an external checker drives it:
//! parse once, then evaluate many elements against the parsed rules.

use arch_query_core::{parse_rules, AqlViolation, SourceElement};

const AQL_SOURCE: &str = "\
# architecture constraints for the sample service
RULE complexity-budget:
  LIMIT *.cyclomatic > 10
  LIMIT app.UserService.lines > 200

RULE layering:
  FORBID app/handlers/* -> app/db/*
  REQUIRE app/handlers/* -> app/service/*
  ALLOW app/service/* -> app/db/*

RULE no-legacy:
  FORBID vendor/legacy
";

#[test]
fn limit_rules_flag_only_offending_elements() {
    let rules = parse_rules(AQL_SOURCE, "arch.aql").expect("AQL source should parse");
    let budget = &rules[0];

    let complex = SourceElement::new("app")
        .with_type("OrderService")
        .with_method("reprice")
        .with_complexity(14);
    let simple = SourceElement::new("app")
        .with_type("OrderService")
        .with_method("lookup")
        .with_complexity(3);

    let violations = budget.evaluate(&complex).expect("evaluation should succeed");
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].rule, "complexity-budget");
    assert_eq!(violations[0].statement, "LIMIT *.cyclomatic > 10");
    assert_eq!(violations[0].subject, "app:OrderService:reprice");

    assert!(budget.evaluate(&simple).expect("evaluation should succeed").is_empty());
}

#[test]
fn both_limits_can_fire_for_one_element() {
    let rules = parse_rules(AQL_SOURCE, "arch.aql").expect("AQL source should parse");
    let element = SourceElement::new("app")
        .with_type("UserService")
        .with_complexity(12)
        .with_lines(250);
    let violations = rules[0].evaluate(&element).expect("evaluation should succeed");
    assert_eq!(violations.len(), 2);
}

#[test]
fn layering_rule_judges_references() {
    let rules = parse_rules(AQL_SOURCE, "arch.aql").expect("AQL source should parse");
    let layering = &rules[1];

    let handler = SourceElement::new("app/handlers/user");
    let db = SourceElement::new("app/db/postgres");
    let service = SourceElement::new("app/service/user");

    // handler -> db breaks both the FORBID and the REQUIRE
    let violations = layering.evaluate_reference(&handler, &db);
    assert_eq!(violations.len(), 2);

    // handler -> service is the sanctioned path
    assert!(layering.evaluate_reference(&handler, &service).is_empty());

    // service -> db is outside the FORBID's from-side
    assert!(layering.evaluate_reference(&service, &db).is_empty());
}

#[test]
fn violations_serialize_for_external_reporters() {
    let rules = parse_rules(AQL_SOURCE, "arch.aql").expect("AQL source should parse");
    let element = SourceElement::new("vendor/legacy");
    let violations = rules[2].evaluate(&element).expect("evaluation should succeed");
    assert_eq!(violations.len(), 1);

    let json = serde_json::to_string(&violations[0]).expect("violation should serialize");
    let back: AqlViolation = serde_json::from_str(&json).expect("violation should deserialize");
    assert_eq!(back, violations[0]);
    assert_eq!(back.rule, "no-legacy");
    assert_eq!(back.line_number, 11);
}

#[test]
fn rule_headers_carry_their_line_numbers() {
    let rules = parse_rules(AQL_SOURCE, "arch.aql").expect("AQL source should parse");
    let headers: Vec<(String, usize)> = rules
        .iter()
        .map(|rule| (rule.name.clone(), rule.line_number))
        .collect();
    assert_eq!(
        headers,
        vec![
            ("complexity-budget".to_string(), 2),
            ("layering".to_string(), 6),
            ("no-legacy".to_string(), 11),
        ]
    );
}
