// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! View command - prints the revisions list for a channel and architecture

use super::Globals;
use crate::source::RevisionSource;
use crate::types::{AvailableMode, FilterContext, RevisionId};
use crate::view::{ViewModel, ViewRow};
use anyhow::{Context, Result};
use chrono::Utc;
use owo_colors::OwoColorize;
use tracing::warn;

/// Standing warning shown when a devmode revision is listed
pub const DEVMODE_WARNING: &str =
    "Revisions in development mode cannot be released to stable or candidate channels.";

/// Arguments of the view command
#[derive(Debug, Clone, Default)]
pub struct ViewArgs {
    /// Channel as `track/risk[/branch]`
    pub channel: Option<String>,
    /// Architecture being browsed
    pub arch: Option<String>,
    /// Available-revisions mode
    pub mode: AvailableMode,
    /// Revisions to select before computing the view
    pub select: Vec<RevisionId>,
    /// Show the full list
    pub all: bool,
}

/// Run the view command
pub fn run(globals: &Globals, args: ViewArgs) -> Result<()> {
    let mut session = globals.open_session()?;
    session.set_filter(parse_filter(args.channel.as_deref(), args.arch.as_deref())?);
    session.set_mode(args.mode);

    if !args.select.is_empty() {
        let catalog = session.catalog();
        for id in &args.select {
            if catalog.revision(*id).is_none() {
                warn!("Revision {} is not in the catalog", id);
            }
        }
        session.toggle_many(args.select);
    }
    if args.all {
        session.reveal();
    }

    print_model(&session.view(Utc::now()), globals)
}

/// Turn `--channel`/`--arch` into a filter
///
/// An architecture alone browses `latest/available`; a channel alone is an
/// error since every filter needs an architecture.
pub fn parse_filter(channel: Option<&str>, arch: Option<&str>) -> Result<Option<FilterContext>> {
    match (channel, arch) {
        (None, None) => Ok(None),
        (channel, Some(arch)) => {
            let channel = channel.unwrap_or("latest/available");
            FilterContext::parse(channel, arch)
                .map(Some)
                .with_context(|| format!("Invalid filter: {channel} on {arch}"))
        }
        (Some(channel), None) => anyhow::bail!("Channel {channel} needs an architecture (--arch)"),
    }
}

/// Print a view as JSON or text depending on the global flags
pub fn print_model(model: &ViewModel, globals: &Globals) -> Result<()> {
    if globals.json {
        let json = serde_json::to_string(model).context("Failed to serialize view")?;
        println!("{json}");
    } else {
        print!("{}", render(model, globals.color));
    }
    Ok(())
}

fn paint(text: &str, color: bool, style: fn(&str) -> String) -> String {
    if color {
        style(text)
    } else {
        text.to_string()
    }
}

fn marker(row: &ViewRow) -> &'static str {
    match (row.is_selectable, row.is_selected) {
        (false, _) => "    ",
        (true, true) => "[x] ",
        (true, false) => "[ ] ",
    }
}

fn row_cells(model: &ViewModel, row: &ViewRow) -> Vec<String> {
    let revision = &row.revision;
    let mut cells = vec![format!("{}{}", marker(row), revision.id), revision.version.clone()];
    if model.show_build_request {
        cells.push(revision.build_id.clone().unwrap_or_else(|| "-".to_string()));
    }
    if model.show_channels {
        let channels = revision.released_channels();
        cells.push(if channels.is_empty() {
            "-".to_string()
        } else {
            channels.join(", ")
        });
    }
    let date = row.released_at.unwrap_or(revision.created_at);
    let mut date = date.format("%Y-%m-%d %H:%M").to_string();
    if row.is_pending {
        date.push_str(" (pending)");
    } else if row.is_active {
        date.push_str(" (active)");
    }
    cells.push(date);
    cells
}

/// Render a view as a plain text table
#[must_use]
pub fn render(model: &ViewModel, color: bool) -> String {
    let mut lines = vec![paint(&model.title, color, |t| t.bold().to_string())];

    if let Some(group) = model.banner() {
        let archs: Vec<&str> = group.covered_architectures.iter().map(String::as_str).collect();
        let action = if model.version_siblings.is_some() {
            "version"
        } else {
            "build"
        };
        let text = format!("{}: {} (accept {action})", group.headline(), archs.join(", "));
        lines.push(paint(&text, color, |t| t.cyan().to_string()));
    }
    if model.has_devmode {
        lines.push(paint(DEVMODE_WARNING, color, |t| t.yellow().to_string()));
    }

    if model.is_empty() {
        let text = if model.is_release_history {
            "No releases"
        } else {
            "No revisions"
        };
        lines.push(text.to_string());
        let mut out = lines.join("\n");
        out.push('\n');
        return out;
    }

    let mut header = vec!["    Revision".to_string(), "Version".to_string()];
    if model.show_build_request {
        header.push("Build request".to_string());
    }
    if model.show_channels {
        header.push("Channels".to_string());
    }
    header.push(model.date_column.label().to_string());

    let rows: Vec<&ViewRow> = model.pinned.iter().chain(model.rows.iter()).collect();
    let table: Vec<Vec<String>> = rows.iter().map(|row| row_cells(model, row)).collect();

    let mut widths: Vec<usize> = header.iter().map(String::len).collect();
    for cells in &table {
        for (width, cell) in widths.iter_mut().zip(cells) {
            *width = (*width).max(cell.chars().count());
        }
    }
    let layout = |cells: &[String]| {
        let padded: Vec<String> = cells
            .iter()
            .zip(&widths)
            .map(|(cell, &width)| format!("{cell:<width$}"))
            .collect();
        padded.join("  ").trim_end().to_string()
    };

    lines.push(paint(&layout(&header), color, |t| t.dimmed().to_string()));
    for (row, cells) in rows.iter().zip(&table) {
        let line = layout(cells);
        let line = if row.is_pending || row.is_active {
            paint(&line, color, |t| t.yellow().to_string())
        } else if row.is_selected {
            paint(&line, color, |t| t.green().to_string())
        } else {
            line
        };
        lines.push(line);
    }

    if let Some(label) = model.show_all_label() {
        lines.push(paint(&label, color, |t| t.underline().to_string()));
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}
