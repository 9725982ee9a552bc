//! Listing CLI commands: list and delete.

use anyhow::{bail, Result};
use comfy_table::{presets, Cell, Color, ContentArrangement, Table};
use console::style;
use dialoguer::Confirm;

use intake_core::listing::{AlwaysConfirm, DeleteOutcome, DeletePrompt, SessionSummary};
use intake_types::error::SessionError;
use intake_types::session::SessionId;

use crate::cli::spinner;
use crate::state::AppState;

/// List all saved questionnaires in a table.
pub async fn list_forms(state: &AppState, json: bool) -> Result<()> {
    let mut listing = state.listing(AlwaysConfirm);
    let spinner = spinner("Loading questionnaires...")?;
    listing.refresh().await;
    spinner.finish_and_clear();

    let entries = listing.entries();

    if json {
        println!("{}", serde_json::to_string_pretty(entries)?);
        return Ok(());
    }

    if listing.is_degraded() {
        println!();
        println!(
            "  {} Could not reach the {} store; showing no entries.",
            style("!").yellow().bold(),
            state.store.backend()
        );
    }

    if entries.is_empty() {
        println!();
        println!(
            "  {} No questionnaires found. Start one with: {}",
            style("i").blue().bold(),
            style("intake fill").yellow()
        );
        println!();
        return Ok(());
    }

    println!();
    println!("{}", render_table(entries));
    println!();
    println!(
        "  {} questionnaire{}",
        style(entries.len()).bold(),
        if entries.len() == 1 { "" } else { "s" }
    );
    println!();

    Ok(())
}

fn render_table(entries: &[SessionSummary]) -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("Title").fg(Color::White),
        Cell::new("Progress").fg(Color::White),
        Cell::new("Updated").fg(Color::White),
        Cell::new("ID").fg(Color::White),
    ]);

    for entry in entries {
        let progress = format!(
            "{}% ({}/{})",
            entry.progress.percent, entry.progress.answered, entry.progress.total
        );
        let progress_cell = if entry.progress.complete {
            Cell::new(format!("✓ {progress}")).fg(Color::Green)
        } else {
            Cell::new(progress).fg(Color::Yellow)
        };

        table.add_row(vec![
            Cell::new(&entry.title).fg(Color::Cyan),
            progress_cell,
            Cell::new(
                entry
                    .updated_at
                    .as_ref()
                    .map_or_else(|| "unknown".to_string(), format_relative_time),
            )
            .fg(Color::DarkGrey),
            Cell::new(entry.id.as_str()).fg(Color::DarkGrey),
        ]);
    }

    table
}

/// Asks on the terminal unless `--force` waived confirmation.
///
/// The prompt is drawn on stderr, so `--json` output on stdout stays clean
/// while still asking.
struct TerminalPrompt {
    skip: bool,
}

impl TerminalPrompt {
    fn new(force: bool) -> Self {
        Self { skip: force }
    }
}

impl DeletePrompt for TerminalPrompt {
    fn confirm_delete(&self, entry: &SessionSummary) -> bool {
        if self.skip {
            return true;
        }
        Confirm::new()
            .with_prompt(format!(
                "Permanently delete '{}' ({}% complete)?",
                style(&entry.title).red().bold(),
                entry.progress.percent
            ))
            .default(false)
            .interact()
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "confirmation prompt failed, treating as no");
                false
            })
    }
}

/// Delete a saved questionnaire after confirmation.
pub async fn delete_form(state: &AppState, id: &str, force: bool, json: bool) -> Result<()> {
    let id = SessionId::from(id);
    let mut listing = state.listing(TerminalPrompt::new(force));

    let outcome = match listing.delete(&id).await {
        Ok(outcome) => outcome,
        Err(SessionError::NotFound) if listing.is_degraded() => {
            bail!("Could not reach the {} store to look up '{id}'", state.store.backend())
        }
        Err(SessionError::NotFound) => bail!("No questionnaire with id '{id}'"),
        Err(e) => return Err(e.into()),
    };

    if json {
        println!(
            "{}",
            serde_json::json!({
                "deleted": outcome != DeleteOutcome::Cancelled,
                "uuid": id,
            })
        );
        return Ok(());
    }

    match outcome {
        DeleteOutcome::Cancelled => println!("  Cancelled."),
        DeleteOutcome::Deleted => {
            println!("  {} Questionnaire {} deleted.", style("✓").red().bold(), style(&id).dim())
        }
        DeleteOutcome::AlreadyGone => println!(
            "  {} Questionnaire {} was already deleted.",
            style("i").blue().bold(),
            style(&id).dim()
        ),
    }

    Ok(())
}

// --- Formatting helpers ---

fn format_relative_time(dt: &chrono::DateTime<chrono::Utc>) -> String {
    let diff = chrono::Utc::now() - *dt;

    if diff.num_minutes() < 1 {
        "just now".to_string()
    } else if diff.num_hours() < 1 {
        format!("{}m ago", diff.num_minutes())
    } else if diff.num_days() < 1 {
        format!("{}h ago", diff.num_hours())
    } else if diff.num_days() < 30 {
        format!("{}d ago", diff.num_days())
    } else {
        dt.format("%Y-%m-%d").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use clap::Parser;
    use crate::cli::{Cli, Commands};
    use intake_core::progress::Progress;

    fn summary(title: &str, answered: usize) -> SessionSummary {
        SessionSummary {
            id: SessionId::from("abc-123"),
            title: title.to_string(),
            progress: Progress {
                answered,
                total: 4,
                percent: (answered * 25) as u8,
                complete: answered == 4,
            },
            updated_at: Some(Utc::now()),
        }
    }

    #[test]
    fn relative_time_buckets() {
        let now = Utc::now();
        assert_eq!(format_relative_time(&now), "just now");
        assert_eq!(format_relative_time(&(now - Duration::minutes(5))), "5m ago");
        assert_eq!(format_relative_time(&(now - Duration::hours(3))), "3h ago");
        assert_eq!(format_relative_time(&(now - Duration::days(2))), "2d ago");
        let old = now - Duration::days(90);
        assert_eq!(format_relative_time(&old), old.format("%Y-%m-%d").to_string());
    }

    #[test]
    fn table_has_one_row_per_entry() {
        let table = render_table(&[summary("Alice (29)", 2), summary("Unnamed", 4)]);
        assert_eq!(table.row_iter().count(), 2);
        let rendered = table.to_string();
        assert!(rendered.contains("Alice (29)"));
        assert!(rendered.contains("50% (2/4)"));
        assert!(rendered.contains("✓ 100% (4/4)"));
    }

    #[test]
    fn skipped_prompt_always_confirms() {
        let prompt = TerminalPrompt::new(true);
        assert!(prompt.confirm_delete(&summary("Alice", 1)));
    }

    #[test]
    fn json_delete_without_force_still_asks() {
        let cli = Cli::try_parse_from(["intake", "--json", "delete", "abc-123"]).unwrap();
        assert!(cli.json);
        let Commands::Delete { force, .. } = cli.command else {
            panic!("expected delete command");
        };
        assert!(!TerminalPrompt::new(force).skip);
    }

    #[test]
    fn missing_timestamp_renders_as_unknown() {
        let mut entry = summary("Alice (29)", 2);
        entry.updated_at = None;
        let rendered = render_table(&[entry]).to_string();
        assert!(rendered.contains("unknown"));
    }
}
