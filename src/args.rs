use crate::Result;

use std::{env, fs, path::PathBuf};

use anyhow::Context;

use thiserror::Error;

const USAGE: &str = "usage: txe [--verbose] <scenario.csv>";

#[derive(Error, Debug)]
pub enum InputArgsError {
    #[error("Couldn't parse input arguments: {0}\n{}", USAGE)]
    Parse(String),

    #[error("Scenario file not found: {0}")]
    FileNotFound(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioArgs {
    pub input: PathBuf,
    pub verbose: bool,
}

/// Parses the process arguments and canonicalises the scenario path
pub fn parse_input_args() -> Result<ScenarioArgs> {
    let (filename, verbose) = split_args(env::args().skip(1))?;

    let input = fs::canonicalize(&filename).with_context(|| InputArgsError::FileNotFound(filename))?;

    return Ok(ScenarioArgs { input, verbose });
}

/// Exactly one scenario file, optionally preceded or followed by `--verbose`
fn split_args(args: impl Iterator<Item = String>) -> Result<(String, bool)> {
    let mut filename = None;
    let mut verbose = false;

    for arg in args {
        match arg.as_str() {
            "-v" | "--verbose" => verbose = true,
            flag if flag.starts_with('-') => {
                Err(InputArgsError::Parse(format!("unknown flag {flag}")))?
            }
            _ if filename.is_some() => {
                Err(InputArgsError::Parse(format!("unexpected argument {arg}")))?
            }
            _ => filename = Some(arg),
        }
    }

    let filename = filename
        .ok_or_else(|| InputArgsError::Parse("a scenario file is required".to_string()))?;

    return Ok((filename, verbose));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split(args: &[&str]) -> Result<(String, bool)> {
        return split_args(args.iter().map(|arg| arg.to_string()));
    }

    #[test]
    fn scenario_file_only() {
        assert_eq!(split(&["scenario.csv"]).unwrap(), ("scenario.csv".to_string(), false));
    }

    #[test]
    fn verbose_on_either_side() {
        assert_eq!(split(&["-v", "a.csv"]).unwrap(), ("a.csv".to_string(), true));
        assert_eq!(split(&["a.csv", "--verbose"]).unwrap(), ("a.csv".to_string(), true));
    }

    #[test]
    fn fail_without_scenario_file() {
        assert!(split(&[]).is_err());
        assert!(split(&["--verbose"]).is_err());
    }

    #[test]
    fn fail_on_extra_arguments() {
        assert!(split(&["a.csv", "b.csv"]).is_err());
        assert!(split(&["--quiet", "a.csv"]).is_err());
    }
}
