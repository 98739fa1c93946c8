use crate::model::{Config, RunTotals};
use crate::output::Reporter;
use crate::scanner;
use anyhow::Result;

/// Drives one full scan-and-remove pass over every configured root.
pub struct App {
    config: Config,
    reporter: Reporter,
}

impl App {
    pub fn new(config: Config) -> Self {
        let reporter = Reporter::new(&config);
        Self { config, reporter }
    }

    /// Processes the roots in order and prints the final summary. A root
    /// that fails outright is reported and skipped; the run carries on and
    /// still counts as a success.
    pub fn run(&self) -> Result<RunTotals> {
        self.reporter.preamble(&self.config);

        let mut totals = RunTotals::default();
        for root in &self.config.roots {
            self.reporter.scanning_root(root);
            match scanner::scan_root(root, &self.config, &self.reporter) {
                Ok(outcome) => {
                    totals.found += outcome.found;
                    totals.removed += outcome.removed;
                    totals.bytes += outcome.bytes;
                }
                Err(err) => self.reporter.root_error(root, &err),
            }
        }

        self.reporter.summary(&totals, &self.config);
        Ok(totals)
    }
}
