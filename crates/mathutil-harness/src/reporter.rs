//! Test reporter - display test results

use crate::runner::{Summary, SuiteRun, TestResult, TestRun};
use colored::*;
use serde_json::{json, Value};
use std::io::{self, Write};

/// Test reporter with output configuration
pub struct TestReporter {
    /// Show detailed output for each test
    verbose: bool,
    /// Disable colored output
    no_color: bool,
    /// Print the lifecycle journal of every suite
    lifecycle: bool,
}

impl Default for TestReporter {
    fn default() -> Self {
        Self::new(false)
    }
}

impl TestReporter {
    /// Create a new test reporter
    pub fn new(verbose: bool) -> Self {
        Self {
            verbose,
            no_color: false,
            lifecycle: false,
        }
    }

    /// Disable colored output
    pub fn with_no_color(mut self, no_color: bool) -> Self {
        self.no_color = no_color;
        self
    }

    pub fn with_lifecycle(mut self, lifecycle: bool) -> Self {
        self.lifecycle = lifecycle;
        self
    }

    /// Report test results on stdout
    pub fn report(&self, suites: &[SuiteRun]) -> io::Result<()> {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        self.write_report(&mut out, suites)
    }

    /// Render the report into `out`
    pub fn write_report<W: Write>(&self, out: &mut W, suites: &[SuiteRun]) -> io::Result<()> {
        if self.no_color {
            colored::control::set_override(false);
        }

        let result = self.render(out, suites);

        // Reset color override
        if self.no_color {
            colored::control::unset_override();
        }
        result
    }

    fn render<W: Write>(&self, out: &mut W, suites: &[SuiteRun]) -> io::Result<()> {
        let total: usize = suites.iter().map(|s| s.runs.len()).sum();

        for suite in suites {
            if self.verbose {
                writeln!(out, "{}", suite.label().bold())?;
            }
            for run in &suite.runs {
                self.print_test_result(out, run)?;
            }
            if self.lifecycle {
                self.print_lifecycle(out, suite)?;
            }
        }

        // Newline before summary if not verbose (dots need newline)
        if !self.verbose && total > 0 {
            writeln!(out)?;
        }

        writeln!(out)?;
        self.print_summary(out, suites)?;

        self.print_failures(out, suites)?;
        self.print_aborts(out, suites)
    }

    /// Print a single test result
    fn print_test_result<W: Write>(&self, out: &mut W, run: &TestRun) -> io::Result<()> {
        let indent = "  ".repeat(run.test.suite.len());
        let (tag, glyph, detail) = match &run.result {
            TestResult::Pass { duration } => (
                "PASS".green().bold(),
                ".".green(),
                format!("{:.2?}", duration),
            ),
            TestResult::Fail { duration, .. } => (
                "FAIL".red().bold(),
                "F".red().bold(),
                format!("{:.2?}", duration),
            ),
            TestResult::Skip { reason } => (
                "SKIP".yellow().bold(),
                "S".yellow(),
                reason.dimmed().to_string(),
            ),
            TestResult::Abort { duration, .. } => (
                "ABORT".cyan().bold(),
                "A".cyan().bold(),
                format!("{:.2?}", duration),
            ),
        };

        if self.verbose {
            writeln!(out, "{}{} {} ({})", indent, tag, run.test.label(), detail)
        } else {
            write!(out, "{}", glyph)?;
            out.flush()
        }
    }

    fn print_lifecycle<W: Write>(&self, out: &mut W, suite: &SuiteRun) -> io::Result<()> {
        if !self.verbose {
            writeln!(out)?;
        }
        writeln!(out, "  {} {}", "Lifecycle of".dimmed(), suite.name.dimmed())?;
        for event in &suite.events {
            writeln!(out, "    {}", event.to_string().dimmed())?;
        }
        Ok(())
    }

    /// Print summary statistics
    fn print_summary<W: Write>(&self, out: &mut W, suites: &[SuiteRun]) -> io::Result<()> {
        let summary = Summary::of(suites);

        writeln!(out, "{}", "─".repeat(50))?;

        let status = if summary.is_success() {
            "PASSED".green().bold()
        } else {
            "FAILED".red().bold()
        };

        writeln!(
            out,
            "Test result: {} | {} total, {} passed, {} failed, {} skipped, {} aborted",
            status,
            summary.total.to_string().bold(),
            summary.passed.to_string().green().bold(),
            if summary.failed > 0 {
                summary.failed.to_string().red().bold()
            } else {
                summary.failed.to_string().normal()
            },
            summary.skipped.to_string().yellow(),
            summary.aborted.to_string().cyan(),
        )?;
        writeln!(out, "Time: {:.2?}", summary.duration)
    }

    /// Print details of failed tests
    fn print_failures<W: Write>(&self, out: &mut W, suites: &[SuiteRun]) -> io::Result<()> {
        let failures: Vec<_> = suites
            .iter()
            .flat_map(|s| &s.runs)
            .filter(|r| r.result.is_fail())
            .collect();

        if failures.is_empty() {
            return Ok(());
        }

        writeln!(out)?;
        writeln!(out, "{}", "Failures:".red().bold())?;
        writeln!(out)?;

        for run in failures {
            writeln!(out, "  {} {}", "●".red(), run.test.suite_label())?;
            writeln!(out, "    {}", run.test.label().bold())?;

            if let Some(error) = run.result.message() {
                for line in error.lines() {
                    writeln!(out, "      {}", line.dimmed())?;
                }
            }
            writeln!(out)?;
        }
        Ok(())
    }

    /// Print why aborted tests stopped
    fn print_aborts<W: Write>(&self, out: &mut W, suites: &[SuiteRun]) -> io::Result<()> {
        let aborts: Vec<_> = suites
            .iter()
            .flat_map(|s| &s.runs)
            .filter(|r| r.result.is_abort())
            .collect();

        if aborts.is_empty() {
            return Ok(());
        }

        writeln!(out)?;
        writeln!(out, "{}", "Aborted:".cyan().bold())?;
        for run in aborts {
            writeln!(
                out,
                "  {} {} {}",
                "●".cyan(),
                run.test.qualified_name(),
                run.result.message().unwrap_or_default().dimmed()
            )?;
        }
        Ok(())
    }
}

/// Machine-readable form of a finished run
pub fn json_report(suites: &[SuiteRun]) -> Value {
    let summary = Summary::of(suites);
    let results: Vec<Value> = suites
        .iter()
        .flat_map(|s| &s.runs)
        .map(|r| {
            json!({
                "suite": r.test.suite_path(),
                "name": r.test.name,
                "display_name": r.test.display_name,
                "outcome": r.result.kind(),
                "message": r.result.message(),
                "duration_ms": r.result.duration().as_millis(),
            })
        })
        .collect();

    json!({
        "tests": summary.total,
        "passed": summary.passed,
        "failed": summary.failed,
        "skipped": summary.skipped,
        "aborted": summary.aborted,
        "results": results,
    })
}
