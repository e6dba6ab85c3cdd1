//! Shared test harness modules for the Superfund CLI.
#![expect(
    clippy::panic,
    reason = "Tests assert panic branches to surface unexpected CLI outcomes"
)]

use super::*;
use crate::score::{ScoreArgs, ScoreConfig, config_from_layers_for_test, run_score_with};

mod helpers;
mod score_steps;
