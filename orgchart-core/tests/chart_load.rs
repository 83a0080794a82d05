//! Chart file loading and error-message tests.

use assert_fs::prelude::*;
use orgchart_core::{chart, ChartError, EmployeeId, TeamId};
use predicates::prelude::predicate;
use rstest::rstest;

const JSON_CHART: &str = r#"{
  "teams": [
    {"id": "engineering", "name": "Engineering", "parent": "", "description": "All of eng",
     "techLead": "e1", "productLead": ""},
    {"id": "platform_core", "name": "Platform Core", "parent": "engineering",
     "description": "Runtime", "techLead": "e2", "productLead": "e3"}
  ],
  "employees": [
    {"id": "e1", "name": "Ada", "github": "ada", "memberOf": "engineering"},
    {"id": "e2", "name": "Bo", "github": "bo", "memberOf": "platform_core"},
    {"id": "e3", "name": "Cy", "github": "", "memberOf": "platform_core"}
  ]
}"#;

const YAML_CHART: &str = r#"
teams:
  - id: engineering
    name: Engineering
    description: All of eng
    techLead: e1
  - id: platform_core
    name: Platform Core
    parent: engineering
    description: Runtime
    techLead: e2
    productLead: e3
employees:
  - id: e1
    name: Ada
    github: ada
    memberOf: engineering
  - id: e2
    name: Bo
    github: bo
    memberOf: platform_core
  - id: e3
    name: Cy
    memberOf: platform_core
"#;

// ---------------------------------------------------------------------------
// 1. Format detection
// ---------------------------------------------------------------------------

#[rstest]
#[case("chart.json", JSON_CHART)]
#[case("chart.yaml", YAML_CHART)]
#[case("chart.yml", YAML_CHART)]
fn load_path_reads_both_formats(#[case] file_name: &str, #[case] contents: &str) {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    let file = dir.child(file_name);
    file.write_str(contents).expect("write chart");

    let chart = chart::load_path(file.path()).expect("load");
    assert_eq!(chart.teams.len(), 2, "{file_name}");
    assert_eq!(chart.employees.len(), 3, "{file_name}");

    let core = chart.team(&TeamId::from("platform_core")).expect("platform_core");
    assert_eq!(core.parent, Some(TeamId::from("engineering")));
    assert_eq!(core.product_lead, Some(EmployeeId::from("e3")));

    let cy = chart.employee(&EmployeeId::from("e3")).expect("e3");
    assert_eq!(cy.handle(), None, "{file_name}: empty handle must read as unlinked");
    assert_eq!(chart.team_of(cy).map(|t| t.name.as_str()), Some("Platform Core"));
}

// ---------------------------------------------------------------------------
// 2. Load error messages
// ---------------------------------------------------------------------------

#[test]
fn load_missing_chart_returns_not_found() {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    let missing = dir.child("nope.json");
    missing.assert(predicate::path::missing());

    let err = chart::load_path(missing.path()).unwrap_err();
    assert!(matches!(err, ChartError::NotFound { .. }), "got: {err}");
    assert!(err.to_string().contains("nope.json"));
}

#[rstest]
#[case("broken.json", "{ \"teams\": [ unclosed")]
#[case("broken.yaml", ": : corrupt : yaml : !!!\n  - broken: [unclosed")]
#[case("list.yaml", "- this is a list, not a mapping\n")]
fn load_malformed_chart_returns_parse_error_with_path(
    #[case] file_name: &str,
    #[case] contents: &str,
) {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    let file = dir.child(file_name);
    file.write_str(contents).expect("write");

    let err = chart::load_path(file.path()).unwrap_err();
    assert!(matches!(err, ChartError::Parse { .. }), "got: {err}");
    let msg = err.to_string();
    assert!(msg.contains(file_name), "must contain file path, got: {msg}");
}

#[test]
fn load_chart_with_unknown_owning_team_is_fatal() {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    let file = dir.child("chart.json");
    file.write_str(
        r#"{"teams": [{"id": "a", "name": "A"}],
            "employees": [{"id": "e9", "name": "Zed", "github": "zed", "memberOf": "b"}]}"#,
    )
    .expect("write");

    let err = chart::load_path(file.path()).unwrap_err();
    assert!(matches!(err, ChartError::UnknownTeam { .. }), "got: {err}");
    assert_eq!(err.to_string(), "could not find team b for member e9");
}

// ---------------------------------------------------------------------------
// 3. Parse helpers
// ---------------------------------------------------------------------------

#[test]
fn json_and_yaml_produce_equivalent_charts() {
    let from_json = chart::from_json_str(JSON_CHART).expect("json");
    let from_yaml = chart::from_yaml_str(YAML_CHART).expect("yaml");
    assert_eq!(from_json.teams, from_yaml.teams);
    assert_eq!(from_json.employees, from_yaml.employees);
}

#[test]
fn empty_document_is_an_empty_chart() {
    let chart = chart::from_json_str("{}").expect("parse");
    assert!(chart.teams.is_empty());
    assert!(chart.employees.is_empty());
}
