// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Session command - drives one in-memory session from line commands
//!
//! Each non-blank line of input is one command. The view is printed after
//! every command that succeeds; a bad line is reported and skipped.

use super::view::{parse_filter, render};
use super::Globals;
use crate::session::{Session, SiblingKind};
use crate::types::{AvailableMode, RevisionId};
use anyhow::{Context, Result};
use chrono::Utc;
use std::io::{self, BufRead, Write};
use tracing::{debug, warn};

/// One parsed input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    /// `filter <track/risk[/branch]> <arch>`
    Filter {
        /// Channel text
        channel: String,
        /// Architecture
        arch: String,
    },
    /// `clear`: drop the filter
    Clear,
    /// `mode <all|unreleased|recent|launchpad>`
    Mode(AvailableMode),
    /// `toggle <id>...`
    Toggle(Vec<RevisionId>),
    /// `accept version|build`
    Accept(SiblingKind),
    /// `reveal`: expand the current list
    Reveal,
    /// `view`: print the view unchanged
    View,
    /// `quit` or `exit`
    Quit,
}

impl SessionCommand {
    /// Parse a line; `None` for blank lines and `#` comments
    pub fn parse(line: &str) -> Result<Option<Self>> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }
        let mut words = line.split_whitespace();
        let verb = words.next().unwrap_or_default();
        let args: Vec<&str> = words.collect();

        let command = match (verb, args.as_slice()) {
            ("filter", [channel, arch]) => Self::Filter {
                channel: (*channel).to_string(),
                arch: (*arch).to_string(),
            },
            ("filter", _) => anyhow::bail!("Usage: filter <track/risk[/branch]> <arch>"),
            ("clear", []) => Self::Clear,
            ("mode", [mode]) => Self::Mode(mode.parse()?),
            ("toggle", ids) if !ids.is_empty() => Self::Toggle(
                ids.iter()
                    .map(|id| id.parse::<RevisionId>())
                    .collect::<Result<Vec<_>, _>>()?,
            ),
            ("accept", ["version"]) => Self::Accept(SiblingKind::Version),
            ("accept", ["build"]) => Self::Accept(SiblingKind::Build),
            ("accept", _) => anyhow::bail!("Usage: accept version|build"),
            ("reveal", []) => Self::Reveal,
            ("view", []) => Self::View,
            ("quit" | "exit", []) => Self::Quit,
            _ => anyhow::bail!("Unknown command: {line}"),
        };
        Ok(Some(command))
    }
}

/// Apply a command to the session
fn apply(session: &mut Session, command: SessionCommand) -> Result<()> {
    match command {
        SessionCommand::Filter { channel, arch } => {
            session.set_filter(parse_filter(Some(&channel), Some(&arch))?);
        }
        SessionCommand::Clear => session.set_filter(None),
        SessionCommand::Mode(mode) => session.set_mode(mode),
        SessionCommand::Toggle(ids) => session.toggle_many(ids),
        SessionCommand::Accept(kind) => {
            let accepted = session.accept_siblings(kind, Utc::now());
            if accepted.is_empty() {
                anyhow::bail!("No {} siblings to accept", kind_name(kind));
            }
            debug!("Accepted {} sibling revisions", accepted.len());
        }
        SessionCommand::Reveal => {
            session.reveal();
        }
        SessionCommand::View | SessionCommand::Quit => {}
    }
    Ok(())
}

fn kind_name(kind: SiblingKind) -> &'static str {
    match kind {
        SiblingKind::Version => "version",
        SiblingKind::Build => "build",
    }
}

/// Run commands from `input` against `session`, writing views to `output`
///
/// Returns the number of lines that failed.
pub fn run_script<R, W>(
    session: &mut Session,
    input: R,
    output: &mut W,
    globals: &Globals,
) -> Result<usize>
where
    R: BufRead,
    W: Write,
{
    let mut failures = 0;
    for (number, line) in input.lines().enumerate() {
        let line = line.context("Failed to read session input")?;
        let command = match SessionCommand::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                warn!("Line {}: {:#}", number + 1, e);
                writeln!(output, "error: {e:#}")?;
                failures += 1;
                continue;
            }
        };
        if command == SessionCommand::Quit {
            break;
        }
        if let Err(e) = apply(session, command) {
            warn!("Line {}: {:#}", number + 1, e);
            writeln!(output, "error: {e:#}")?;
            failures += 1;
            continue;
        }

        let model = session.view(Utc::now());
        if globals.json {
            let json = serde_json::to_string(&model).context("Failed to serialize view")?;
            writeln!(output, "{json}")?;
        } else {
            write!(output, "{}", render(&model, globals.color))?;
            writeln!(output)?;
        }
    }
    Ok(failures)
}

/// Run the session command on stdin/stdout
pub fn run(globals: &Globals) -> Result<()> {
    let mut session = globals.open_session()?;
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut output = stdout.lock();
    let failures = run_script(&mut session, stdin.lock(), &mut output, globals)?;
    output.flush()?;
    if failures > 0 {
        debug!("{} session commands failed", failures);
    }
    Ok(())
}
