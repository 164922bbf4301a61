//! Progress reporting for agent runs
//!
//! Both reporters write to stderr so that stdout carries only the result.

use archivist_application::RunProgressNotifier;
use archivist_domain::{AuditReceipt, RunPhase, RunResult, ToolCall, ToolResult};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::sync::Mutex;
use std::time::Duration;

/// Spinner-based reporter for interactive terminals
pub struct ProgressReporter {
    bar: Mutex<Option<ProgressBar>>,
    verbose: bool,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            bar: Mutex::new(None),
            verbose: false,
        }
    }

    /// Also print every tool result and audit receipt
    pub fn verbose() -> Self {
        Self {
            bar: Mutex::new(None),
            verbose: true,
        }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {prefix:.bold.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn phase_name(phase: RunPhase) -> &'static str {
        match phase {
            RunPhase::Reasoning => "Reasoning",
            RunPhase::Dispatching => "Running tools",
            RunPhase::Folding => "Folding results",
            RunPhase::Terminated => "Done",
        }
    }

    fn set_message(&self, message: String) {
        if let Ok(guard) = self.bar.lock()
            && let Some(pb) = guard.as_ref()
        {
            pb.set_message(message);
        }
    }

    /// Print a line above the spinner without tearing it
    fn println(&self, line: String) {
        match self.bar.lock() {
            Ok(guard) => match guard.as_ref() {
                Some(pb) => pb.println(line),
                None => eprintln!("{}", line),
            },
            Err(_) => eprintln!("{}", line),
        }
    }

    fn finish_current(&self) {
        if let Ok(mut guard) = self.bar.lock()
            && let Some(pb) = guard.take()
        {
            pb.finish_and_clear();
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl RunProgressNotifier for ProgressReporter {
    fn on_phase_change(&self, step: usize, phase: RunPhase) {
        self.finish_current();
        if phase == RunPhase::Terminated {
            return;
        }

        let pb = ProgressBar::with_draw_target(None, ProgressDrawTarget::stderr());
        pb.set_style(Self::spinner_style());
        pb.set_prefix(format!("Step {}", step));
        pb.set_message(Self::phase_name(phase).to_string());
        pb.enable_steady_tick(Duration::from_millis(100));

        if let Ok(mut guard) = self.bar.lock() {
            *guard = Some(pb);
        }
    }

    fn on_reasoning_retry(&self, retry: u32, max_retries: u32, error: &str) {
        self.println(format!(
            "  {} reasoning retry {}/{}: {}",
            "!".yellow(),
            retry,
            max_retries,
            error
        ));
    }

    fn on_corrective_note(&self, reason: &str) {
        self.println(format!("  {} malformed reply: {}", "!".yellow(), reason));
    }

    fn on_tool_call(&self, call: &ToolCall) {
        self.set_message(format!("Running {}", call.tool_name.bold()));
    }

    fn on_tool_result(&self, result: &ToolResult) {
        match result.error() {
            Some(error) => self.println(format!(
                "  {} {} {}",
                "x".red(),
                result.tool_name,
                error.to_string().dimmed()
            )),
            None if self.verbose => self.println(format!(
                "  {} {} ({} records)",
                "v".green(),
                result.tool_name,
                result.records().len()
            )),
            None => {}
        }
    }

    fn on_records_dropped(&self, tool_name: &str, dropped: usize) {
        self.println(format!(
            "  {} {}: {} records dropped, context budget spent",
            "!".yellow(),
            tool_name,
            dropped
        ));
    }

    fn on_audit_recorded(&self, receipt: &AuditReceipt) {
        if self.verbose {
            self.println(format!(
                "  {} audited {} ({})",
                "#".magenta(),
                receipt.source_id,
                receipt.sensitivity_label
            ));
        }
    }

    fn on_complete(&self, _result: &RunResult) {
        self.finish_current();
    }
}

/// Simple text-based progress (no fancy UI)
pub struct SimpleProgress;

impl RunProgressNotifier for SimpleProgress {
    fn on_phase_change(&self, step: usize, phase: RunPhase) {
        if phase == RunPhase::Reasoning {
            eprintln!("{} Step {}", "->".cyan(), step);
        }
    }

    fn on_reasoning_retry(&self, retry: u32, max_retries: u32, error: &str) {
        eprintln!("  retry {}/{}: {}", retry, max_retries, error);
    }

    fn on_corrective_note(&self, reason: &str) {
        eprintln!("  malformed reply: {}", reason);
    }

    fn on_tool_call(&self, call: &ToolCall) {
        eprintln!("  {} {}", "*".cyan(), call.tool_name);
    }

    fn on_tool_result(&self, result: &ToolResult) {
        if let Some(error) = result.error() {
            eprintln!("  {} {} {}", "x".red(), result.tool_name, error);
        }
    }

    fn on_records_dropped(&self, tool_name: &str, dropped: usize) {
        eprintln!("  {}: {} records dropped", tool_name, dropped);
    }

    fn on_complete(&self, result: &RunResult) {
        eprintln!(
            "{} {} after {} steps",
            "->".cyan(),
            result.termination,
            result.steps
        );
    }
}
