use std::{
    fs,
    io::Write,
    process::{Command, Stdio},
};

use color_eyre::eyre::{self, OptionExt, WrapErr, eyre};
use color_resolver::Facelets;
use log::{debug, info};

use crate::config::{SolverConfig, SolverEncoding, SolverInput};

/// Hand `facelets` to the configured engine and return the moves it prints.
pub fn solve(config: &SolverConfig, facelets: &Facelets) -> eyre::Result<Vec<String>> {
    // Engines dump their tables in the working directory, so keep it in a cache
    let mut cache = dirs::cache_dir().ok_or_eyre("Could not find a cache directory")?;
    cache.push(&config.cache_dir);
    fs::create_dir_all(&cache)?;

    let cube = match config.encoding {
        SolverEncoding::Twophase => facelets.twophase_input(),
        SolverEncoding::Cubex => facelets.cubex_string(),
    };

    let mut command = Command::new(&config.program);
    command
        .current_dir(&cache)
        .args(&config.args)
        .stdout(Stdio::piped())
        .stderr(Stdio::inherit());
    match config.input {
        SolverInput::Argument => {
            command.arg(&cube).stdin(Stdio::null());
        }
        SolverInput::Stdin => {
            command.stdin(Stdio::piped());
        }
    }

    info!(target: "solver", "Running {} on {cube}", config.program);
    let mut child = command
        .spawn()
        .wrap_err_with(|| format!("Failed to start {}", config.program))?;
    if config.input == SolverInput::Stdin {
        let mut stdin = child.stdin.take().ok_or_eyre("Engine has no standard input")?;
        writeln!(stdin, "{cube}")?;
    }

    let output = child.wait_with_output()?;
    let stdout = String::from_utf8_lossy(&output.stdout);
    debug!(target: "solver", "Engine output:\n{stdout}");
    if !output.status.success() {
        return Err(eyre!("{} exited with {}", config.program, output.status));
    }

    Ok(parse_moves(&stdout))
}

fn is_move(token: &str) -> bool {
    let mut chars = token.chars();
    chars.next().is_some_and(|face| "URFDLBurfdlbMESxyz".contains(face))
        && chars.all(|c| "w2'3".contains(c))
}

/// Pick the move sequence out of an engine's output: the last line made only
/// of moves, ignoring parentheses and a trailing move count such as `(17)`.
pub fn parse_moves(output: &str) -> Vec<String> {
    output
        .lines()
        .rev()
        .map(|line| {
            line.replace(['(', ')'], " ")
                .split_whitespace()
                .filter(|token| token.chars().next().is_some_and(|c| !c.is_ascii_digit()))
                .map(str::to_owned)
                .collect::<Vec<_>>()
        })
        .find(|tokens| !tokens.is_empty() && tokens.iter().all(|token| is_move(token)))
        .unwrap_or_default()
}
