//! Run summary printed on success

use colored::*;
use freeze_core::domain::pipeline::TriggerIds;
use freeze_orchestrator::{
    Action, ActionOutcome, PipelineReport, PurgeOutcome, RecreateOutcome, ReenableOutcome,
    RunReport, SuspendOutcome,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tone {
    Changed,
    Unchanged,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Line {
    tone: Tone,
    text: String,
}

impl Line {
    fn changed(text: impl Into<String>) -> Self {
        Self {
            tone: Tone::Changed,
            text: text.into(),
        }
    }

    fn unchanged(text: impl Into<String>) -> Self {
        Self {
            tone: Tone::Unchanged,
            text: text.into(),
        }
    }

    fn failed(text: impl Into<String>) -> Self {
        Self {
            tone: Tone::Failed,
            text: text.into(),
        }
    }
}

/// Print a summary of a run
pub fn print_report(action: Action, report: &RunReport) {
    if let RunReport::Project(project) = report {
        println!(
            "{}",
            format!(
                "Project {}: {} applied to {} pipeline(s) in {} page(s)",
                project.project_id,
                action,
                project.pipelines.len(),
                project.pages
            )
            .bold()
        );
        if project.pipelines.is_empty() {
            println!("{}", "No pipelines found.".yellow());
        }
    }

    for pipeline in report.pipelines() {
        print_pipeline(pipeline);
    }
}

fn print_pipeline(report: &PipelineReport) {
    println!("  {} Pipeline {}", "▸".cyan(), report.pipeline_id.bold());
    for line in describe(&report.outcome) {
        let text = match line.tone {
            Tone::Changed => line.text.green(),
            Tone::Unchanged => line.text.dimmed(),
            Tone::Failed => line.text.red(),
        };
        println!("    {}", text);
    }
}

fn describe(outcome: &ActionOutcome) -> Vec<Line> {
    let mut lines = Vec::new();
    match outcome {
        ActionOutcome::Suspend(suspend) => describe_suspend(suspend, &mut lines),
        ActionOutcome::Purge(purge) => describe_purge(purge, &mut lines),
        ActionOutcome::SuspendAndPurge(suspend, purge) => {
            describe_suspend(suspend, &mut lines);
            describe_purge(purge, &mut lines);
        }
        ActionOutcome::Restore(restore) => {
            match &restore.reenable {
                ReenableOutcome::NothingToDo => {
                    lines.push(Line::unchanged("No previously disabled triggers"))
                }
                ReenableOutcome::Reenabled { enabled, .. } => {
                    lines.push(Line::changed(format!("Enabled {}", ids(enabled))))
                }
            }
            match &restore.recreate {
                RecreateOutcome::NothingToDo => {
                    lines.push(Line::unchanged("No previously deleted triggers"))
                }
                RecreateOutcome::Recreated { events, .. } => lines.push(Line::changed(format!(
                    "Re-created {} trigger(s): {}",
                    events.len(),
                    events.join(", ")
                ))),
            }
        }
    }

    for write in outcome.failed_checkpoints() {
        lines.push(Line::failed(format!(
            "Checkpoint \"{}\" was not saved, this change cannot be restored",
            write.key
        )));
    }
    lines
}

fn describe_suspend(outcome: &SuspendOutcome, lines: &mut Vec<Line>) {
    match outcome {
        SuspendOutcome::NothingToDo => lines.push(Line::unchanged("No enabled triggers")),
        SuspendOutcome::Suspended { disabled, .. } => {
            lines.push(Line::changed(format!("Disabled {}", ids(disabled))))
        }
    }
}

fn describe_purge(outcome: &PurgeOutcome, lines: &mut Vec<Line>) {
    match outcome {
        PurgeOutcome::NothingToDo => lines.push(Line::unchanged("No trigger registrations")),
        PurgeOutcome::Purged { events, .. } => lines.push(Line::changed(format!(
            "Deleted {} trigger(s): {}",
            events.len(),
            events.join(", ")
        ))),
    }
}

fn ids(ids: &TriggerIds) -> String {
    let mut parts = Vec::new();
    if !ids.git.is_empty() {
        parts.push(format!("git trigger(s) {}", ids.git.join(", ")));
    }
    if !ids.cron.is_empty() {
        parts.push(format!("cron trigger(s) {}", ids.cron.join(", ")));
    }
    if parts.is_empty() {
        "no triggers".to_string()
    } else {
        parts.join("; ")
    }
}
