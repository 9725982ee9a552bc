//! Questionnaire CLI commands: fill (new or resumed) and show.

use std::sync::Arc;

use anyhow::{bail, Result};
use console::style;
use dialoguer::{Confirm, Input, Select};

use intake_core::controller::SessionController;
use intake_core::cursor::Cursor;
use intake_core::gateway::SessionStore;
use intake_core::listing::SessionSummary;
use intake_infra::store::AnyStore;
use intake_types::answer::{AnswerKey, Answers};
use intake_types::error::StoreError;
use intake_types::session::SessionId;

use crate::cli::spinner;
use crate::state::AppState;

/// What the user can do after answering the current step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StepAction {
    Next,
    Back,
    Save,
    SaveAndQuit,
    Quit,
}

impl StepAction {
    fn label(self) -> &'static str {
        match self {
            StepAction::Next => "Next step",
            StepAction::Back => "Previous step",
            StepAction::Save => "Save",
            StepAction::SaveAndQuit => "Save & quit",
            StepAction::Quit => "Quit",
        }
    }
}

/// Back/Next are only offered where they would move the cursor.
fn available_actions(cursor: &Cursor) -> Vec<StepAction> {
    let mut actions = Vec::with_capacity(5);
    if !cursor.is_last() {
        actions.push(StepAction::Next);
    }
    if !cursor.is_first() {
        actions.push(StepAction::Back);
    }
    actions.extend([StepAction::Save, StepAction::SaveAndQuit, StepAction::Quit]);
    actions
}

fn step_bar(fraction: f64, width: usize) -> String {
    let filled = ((fraction.clamp(0.0, 1.0) * width as f64).round() as usize).min(width);
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

/// Fill out a questionnaire interactively.
///
/// With `resume`, the saved questionnaire is loaded first. If it cannot be
/// loaded the user is told so and a new questionnaire starts instead.
///
/// # Examples
///
/// ```bash
/// intake fill
/// intake fill --resume 0192f7e4-...
/// ```
pub async fn fill(state: &AppState, resume: Option<String>, json: bool) -> Result<()> {
    let mut controller = state.controller();

    if let Some(id) = resume {
        let id = SessionId::new(id);
        let spinner = spinner(format!("Loading {id}..."))?;
        let loaded = controller.load(&id).await;
        spinner.finish_and_clear();

        match loaded {
            Ok(()) => println!(
                "  {} Resumed '{}'",
                style("↺").cyan().bold(),
                style(controller.title()).cyan()
            ),
            Err(e) => {
                println!(
                    "  {} Could not resume {}: {e}",
                    style("!").yellow().bold(),
                    style(id).dim()
                );
                println!("  Starting a new questionnaire instead.");
            }
        }
    }

    let mut last_saved = controller.session().answers.clone();
    let mut announced_complete = controller.is_complete();

    println!();
    println!("  {}", style(controller.catalog().title()).bold());

    loop {
        render_step_header(&controller);
        answer_current_step(&mut controller)?;

        let progress = controller.progress();
        println!(
            "  {} {}/{} answered ({}%)",
            style("•").dim(),
            progress.answered,
            progress.total,
            progress.percent
        );

        if progress.complete && !announced_complete {
            println!();
            println!(
                "  {} All questions answered. Save to keep your answers.",
                style("✓").green().bold()
            );
            announced_complete = true;
        } else if !progress.complete {
            announced_complete = false;
        }

        let actions = available_actions(controller.cursor());
        let labels: Vec<&str> = actions.iter().map(|a| a.label()).collect();
        let choice = Select::new()
            .with_prompt("What next?")
            .items(&labels)
            .default(0)
            .interact()?;

        match actions[choice] {
            StepAction::Next => {
                controller.next();
            }
            StepAction::Back => {
                controller.back();
            }
            StepAction::Save => {
                if save_with_feedback(&mut controller).await?.is_some() {
                    last_saved = controller.session().answers.clone();
                }
            }
            StepAction::SaveAndQuit => {
                if save_with_feedback(&mut controller).await?.is_some() {
                    break;
                }
            }
            StepAction::Quit => {
                if confirm_discard(&controller.session().answers, &last_saved)? {
                    break;
                }
            }
        }
    }

    if json {
        let summary = serde_json::json!({
            "uuid": controller.session_id(),
            "title": controller.title(),
            "progress": controller.progress(),
        });
        println!("{}", serde_json::to_string_pretty(&summary)?);
    }

    Ok(())
}

fn render_step_header(controller: &SessionController<Arc<AnyStore>>) {
    let cursor = controller.cursor();
    println!();
    println!(
        "  {}  {}",
        style(cursor.position_label()).bold(),
        style(&controller.current_step().name).cyan()
    );
    println!("  {}", style(step_bar(cursor.step_fraction(), 24)).cyan());
    println!();
}

fn answer_current_step(controller: &mut SessionController<Arc<AnyStore>>) -> Result<()> {
    let prompts: Vec<String> = controller
        .current_questions()
        .iter()
        .map(|q| q.prompt.clone())
        .collect();

    for (question, prompt) in prompts.iter().enumerate() {
        let text = Input::<String>::new()
            .with_prompt(prompt)
            .with_initial_text(controller.answer(question))
            .allow_empty(true)
            .interact_text()?;
        controller.edit_answer(question, text)?;
    }

    Ok(())
}

/// Save and report the outcome. A failed save is not fatal: the answers stay
/// in memory and the user can save again.
async fn save_with_feedback(
    controller: &mut SessionController<Arc<AnyStore>>,
) -> Result<Option<SessionId>> {
    let spinner = spinner("Saving...")?;
    let saved = controller.save().await;
    spinner.finish_and_clear();

    match saved {
        Ok(id) => {
            println!("  {} Saved as {}", style("✓").green().bold(), style(&id).dim());
            Ok(Some(id))
        }
        Err(e) => {
            println!("  {} Save failed: {e}", style("✗").red().bold());
            println!("  Your answers are kept. Choose Save to try again.");
            Ok(None)
        }
    }
}

fn confirm_discard(current: &Answers, last_saved: &Answers) -> Result<bool> {
    if current == last_saved {
        return Ok(true);
    }
    Ok(Confirm::new()
        .with_prompt("Quit and discard unsaved answers?")
        .default(false)
        .interact()?)
}

/// Print every answer of a saved questionnaire, step by step.
pub async fn show_form(state: &AppState, id: &str, json: bool) -> Result<()> {
    let record = match state.store.fetch(&SessionId::from(id)).await {
        Ok(record) => record,
        Err(StoreError::NotFound) => bail!("No questionnaire with id '{id}'"),
        Err(e) => return Err(e.into()),
    };
    let catalog = &state.catalog;
    let summary = SessionSummary::from_record(catalog, &record);

    if json {
        let body = serde_json::json!({
            "uuid": summary.id,
            "title": summary.title,
            "progress": summary.progress,
            "updated_at": summary.updated_at,
            "data": record.answers,
        });
        println!("{}", serde_json::to_string_pretty(&body)?);
        return Ok(());
    }

    println!();
    println!("  {}", style(&summary.title).cyan().bold());
    println!("  {}", style(&summary.id).dim());
    println!();
    println!(
        "  {}  {}% ({}/{}){}",
        style("Progress:").bold(),
        summary.progress.percent,
        summary.progress.answered,
        summary.progress.total,
        if summary.progress.complete {
            format!(" {}", style("complete").green())
        } else {
            String::new()
        }
    );
    println!(
        "  {}   {}",
        style("Updated:").bold(),
        summary.updated_at.map_or_else(
            || "unknown".to_string(),
            |t| t.format("%Y-%m-%d %H:%M UTC").to_string()
        )
    );

    for (step_index, step) in catalog.steps().iter().enumerate() {
        println!();
        println!("  {}", style(format!("── {} ──", step.name)).dim());
        for (question_index, question) in step.questions.iter().enumerate() {
            let answer = record.answers.get(&AnswerKey::new(step_index, question_index));
            println!("  {}", style(&question.prompt).bold());
            if answer.trim().is_empty() {
                println!("    {}", style("(unanswered)").dim());
            } else {
                println!("    {answer}");
            }
        }
    }

    let extra: Vec<_> = record
        .answers
        .iter()
        .filter(|(key, _)| !catalog.contains(key))
        .collect();
    if !extra.is_empty() {
        println!();
        println!("  {}", style("── Not in the current catalog ──").dim());
        for (key, text) in extra {
            println!("  {}  {text}", style(key).dim());
        }
    }
    println!();

    Ok(())
}
