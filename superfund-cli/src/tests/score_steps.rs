//! Behaviour-driven step definitions driving the score CLI scenarios.

use super::helpers::{ARTIFACT_NAME, StudyArea};
use super::*;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use std::cell::RefCell;
use superfund_scorer::{Factor, ScoringError};

#[derive(Debug)]
struct ScoreWorld {
    area: StudyArea,
    omitted: RefCell<Vec<&'static str>>,
    extra_args: RefCell<Vec<String>>,
    stdout: RefCell<Vec<u8>>,
    result: RefCell<Option<Result<(), CliError>>>,
}

impl ScoreWorld {
    fn new() -> Self {
        Self {
            area: StudyArea::new(),
            omitted: RefCell::new(Vec::new()),
            extra_args: RefCell::new(Vec::new()),
            stdout: RefCell::new(Vec::new()),
            result: RefCell::new(None),
        }
    }

    fn build_command_line(&self) -> Vec<String> {
        let mut argv = vec!["superfund".to_owned(), "score".to_owned()];
        let omitted = self.omitted.borrow();
        for (flag, value) in self.area.flags() {
            if !omitted.contains(&flag) {
                argv.push(format!("--{flag}"));
                argv.push(value);
            }
        }
        argv.extend(self.extra_args.borrow().iter().cloned());
        argv
    }
}

#[fixture]
fn world() -> ScoreWorld {
    ScoreWorld::new()
}

#[given("a study area exists on disk")]
fn study_area_exists(#[from(world)] world: &ScoreWorld) {
    assert!(world.area.layer(ARG_SITES).is_file());
    assert!(world.area.layer(ARG_SCHOOLS).is_file());
}

#[given("I omit the severity weight")]
fn omit_severity_weight(#[from(world)] world: &ScoreWorld) {
    world.omitted.borrow_mut().push(ARG_SEVERITY_WEIGHT);
}

#[given("the school layer has been deleted")]
fn delete_school_layer(#[from(world)] world: &ScoreWorld) {
    std::fs::remove_file(world.area.layer(ARG_SCHOOLS)).expect("remove school layer");
}

#[given("I choose the reject policy for tied factors")]
fn choose_reject_policy(#[from(world)] world: &ScoreWorld) {
    world
        .extra_args
        .borrow_mut()
        .extend([format!("--{ARG_DEGENERATE_POLICY}"), "reject".to_owned()]);
}

#[when("I run the score command")]
fn run_score_command(#[from(world)] world: &ScoreWorld) {
    let invocation = world.build_command_line();
    let parsed = Cli::try_parse_from(invocation).map_err(CliError::from);
    let outcome = parsed.and_then(|cli| match cli.command {
        Command::Score(args) => {
            let mut buffer = world.stdout.borrow_mut();
            run_score_with(args, &mut *buffer)
        }
    });
    world.result.replace(Some(outcome));
}

#[then("the command succeeds")]
fn command_succeeds(#[from(world)] world: &ScoreWorld) {
    let borrowed = world.result.borrow();
    let result = borrowed.as_ref().expect("result recorded");
    if let Err(err) = result {
        panic!("expected success, found {err:?}");
    }
}

#[then("the scored table is written under the output directory")]
fn table_written(#[from(world)] world: &ScoreWorld) {
    let expected = world.area.output_dir().join(ARTIFACT_NAME);
    assert!(expected.is_file(), "missing {expected}");

    let stdout = String::from_utf8(world.stdout.borrow().clone()).expect("stdout utf-8");
    assert_eq!(stdout.lines().next(), Some(expected.as_str()));

    let text = std::fs::read_to_string(&expected).expect("read scored table");
    let value: serde_json::Value = serde_json::from_str(&text).expect("scored table is JSON");
    let features = value["features"].as_array().expect("features array");
    assert_eq!(features.len(), 2);
    assert_eq!(features[0]["properties"]["school_score"], serde_json::json!(50.5));
}

#[then("the report lists the sites by rank")]
fn report_lists_ranking(#[from(world)] world: &ScoreWorld) {
    let stdout = String::from_utf8(world.stdout.borrow().clone()).expect("stdout utf-8");
    let ranked: Vec<Vec<&str>> = stdout
        .lines()
        .skip(1)
        .map(|line| line.split('\t').collect())
        .collect();
    assert_eq!(ranked.len(), 2);
    assert_eq!(ranked[0][..2], ["1", "NJD000000001"]);
    assert_eq!(ranked[1][..2], ["2", "NJD000000002"]);
    // sqrt(251.5 / 4) and sqrt(152.5 / 4)
    assert_eq!(ranked[0][2], "7.929");
    assert_eq!(ranked[1][2], "6.175");
}

#[then("the command fails because the severity weight is missing")]
fn command_fails_missing_weight(#[from(world)] world: &ScoreWorld) {
    let borrowed = world.result.borrow();
    let error = borrowed
        .as_ref()
        .expect("result recorded")
        .as_ref()
        .expect_err("expected error");
    match error {
        CliError::MissingArgument { field, env } => {
            assert_eq!(*field, ARG_SEVERITY_WEIGHT);
            assert_eq!(*env, ENV_SEVERITY_WEIGHT);
        }
        other => panic!("expected MissingArgument, found {other:?}"),
    }
}

#[then("the command fails because the school layer is missing")]
fn command_fails_missing_layer(#[from(world)] world: &ScoreWorld) {
    let borrowed = world.result.borrow();
    let error = borrowed
        .as_ref()
        .expect("result recorded")
        .as_ref()
        .expect_err("expected error");
    match error {
        CliError::MissingSourceFile { field, .. } => assert_eq!(*field, ARG_SCHOOLS),
        other => panic!("expected MissingSourceFile, found {other:?}"),
    }
}

#[then("the command fails because the school count is tied")]
fn command_fails_tied_factor(#[from(world)] world: &ScoreWorld) {
    let borrowed = world.result.borrow();
    let error = borrowed
        .as_ref()
        .expect("result recorded")
        .as_ref()
        .expect_err("expected error");
    match error {
        CliError::Score(ScoringError::DegenerateRange { factor, .. }) => {
            assert_eq!(*factor, Factor::School);
        }
        other => panic!("expected DegenerateRange, found {other:?}"),
    }
}

#[then("no scored table is written")]
fn no_table_written(#[from(world)] world: &ScoreWorld) {
    assert!(!world.area.output_dir().exists());
    assert!(world.stdout.borrow().is_empty());
}

macro_rules! register_score_scenario {
    ($fn_name:ident, $scenario_title:literal) => {
        #[scenario(path = "tests/features/score_command.feature", name = $scenario_title)]
        fn $fn_name(#[from(world)] world: ScoreWorld) {
            let _ = world;
        }
    };
}

register_score_scenario!(score_happy_path, "scoring a projected study area");
register_score_scenario!(score_missing_weight, "rejecting a missing weight");
register_score_scenario!(score_missing_layer, "rejecting a missing layer file");
register_score_scenario!(score_tied_factor, "rejecting a tied factor under the reject policy");
