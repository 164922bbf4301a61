//! Console output formatter for run results

use crate::output::formatter::OutputFormatter;
use archivist_application::AgentError;
use archivist_domain::{AuditRecord, RunResult, TerminationReason};
use colored::Colorize;

/// Formats run results for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format the complete run result
    pub fn format(result: &RunResult) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("Answer"));
        output.push('\n');

        match &result.answer {
            Some(answer) => output.push_str(&format!("\n{}\n", answer)),
            None => output.push_str(&format!("\n{}\n", "(no answer)".dimmed())),
        }

        if result.termination == TerminationReason::BudgetExceeded {
            output.push_str(&format!(
                "\n{} step budget exhausted after {} steps; this answer is partial\n",
                "!".yellow().bold(),
                result.steps
            ));
        }

        output.push_str(&Self::section_header("Citations"));
        if result.citations.is_empty() {
            output.push_str(&format!("  {}\n", "none".dimmed()));
        }
        for (i, citation) in result.citations.iter().enumerate() {
            let location = if citation.location.is_empty() {
                String::new()
            } else {
                format!(", {}", citation.location)
            };
            output.push_str(&format!(
                "  [{}] {}{} {}\n",
                i + 1,
                citation.source_id.bold(),
                location,
                format!("({})", citation.sensitivity_label).dimmed()
            ));
        }

        output.push_str(&Self::section_header("Run Summary"));
        output.push_str(&format!("  {} {}\n", "Run:".cyan(), result.run_id));
        output.push_str(&format!("  {} {}\n", "Steps:".cyan(), result.steps));
        output.push_str(&format!("  {} {}\n", "Tool calls:".cyan(), result.tool_calls));
        output.push_str(&format!(
            "  {} {}\n",
            "Termination:".cyan(),
            result.termination.as_str()
        ));
        if result.audit_ids.is_empty() {
            output.push_str(&format!("  {} none\n", "Audit records:".cyan()));
        } else {
            output.push_str(&format!("  {}\n", "Audit records:".cyan()));
            for id in &result.audit_ids {
                output.push_str(&format!("    * {}\n", id));
            }
        }

        output.push_str(&Self::footer());
        output
    }

    /// Format as JSON
    pub fn format_json(result: &RunResult) -> String {
        serde_json::to_string_pretty(result).unwrap_or_else(|_| "{}".to_string())
    }

    pub fn format_error(error: &AgentError) -> String {
        let mut output = format!("{} {}\n", "Error:".red().bold(), error.kind);
        output.push_str(&format!(
            "  {} {}\n  {} {}\n  {} {}\n",
            "Run:".dimmed(),
            error.run_id,
            "Step:".dimmed(),
            error.step,
            "Component:".dimmed(),
            error.component
        ));
        if !error.audit_ids.is_empty() {
            output.push_str(&format!(
                "  {} {}\n",
                "Acknowledged audit records:".dimmed(),
                error.audit_ids.join(", ")
            ));
        }
        output
    }

    /// JSON document for a fatal error
    pub fn format_error_json(error: &AgentError) -> String {
        let value = serde_json::json!({
            "error": error.kind.to_string(),
            "run_id": error.run_id,
            "step": error.step,
            "component": error.component.to_string(),
            "audit_ids": error.audit_ids,
        });
        serde_json::to_string_pretty(&value).unwrap_or_else(|_| "{}".to_string())
    }

    pub fn format_audit(records: &[AuditRecord]) -> String {
        if records.is_empty() {
            return format!("{}\n", "No audit records found.".dimmed());
        }
        let mut output = String::new();
        for record in records {
            output.push_str(&format!(
                "{} {} {} {} {} {}\n",
                record.timestamp.to_rfc3339().dimmed(),
                record.actor.bold(),
                record.action.as_str().yellow(),
                record.source_id,
                format!("({})", record.sensitivity_label).dimmed(),
                format!("[{} {}]", record.run_id, record.id).dimmed()
            ));
        }
        output.push_str(&format!("\n{} record(s)\n", records.len()));
        output
    }

    pub fn format_audit_json(records: &[AuditRecord]) -> String {
        serde_json::to_string_pretty(records).unwrap_or_else(|_| "[]".to_string())
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format(&self, result: &RunResult) -> String {
        Self::format(result)
    }

    fn format_json(&self, result: &RunResult) -> String {
        Self::format_json(result)
    }

    fn format_error(&self, error: &AgentError) -> String {
        Self::format_error(error)
    }

    fn format_audit(&self, records: &[AuditRecord]) -> String {
        Self::format_audit(records)
    }
}
