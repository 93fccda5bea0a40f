// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

// Argument parsing tests, split by command group.

use super::*;

mod project_tests;
mod sync_tests;

fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
    use clap::Parser;
    Cli::try_parse_from(std::iter::once("backlog").chain(args.iter().copied()))
}
