use crate::model::{Config, RunTotals, TargetDir};
use colored::Colorize;
use humansize::{BINARY, format_size};
use std::path::Path;
use std::time::Duration;

/// Console reporter. Every line the scan produces goes through here so the
/// `verbose`/`quiet` gating lives in one place; `quiet` wins over `verbose`.
#[derive(Debug, Clone, Copy)]
pub struct Reporter {
    verbose: bool,
    quiet: bool,
}

impl Reporter {
    pub fn new(config: &Config) -> Self {
        Self {
            verbose: config.verbose,
            quiet: config.quiet,
        }
    }

    fn chatty(self) -> bool {
        self.verbose && !self.quiet
    }

    pub fn preamble(self, config: &Config) {
        if !self.chatty() {
            return;
        }
        let dirs: Vec<String> = config
            .roots
            .iter()
            .map(|root| root.display().to_string())
            .collect();
        println!("Scanning directories: {}", dirs.join(", "));
        println!("Age threshold: {}", format_age(config.age));
        if config.dry_run {
            println!("{}", "DRY RUN MODE - No files will be deleted".yellow());
        }
        println!();
    }

    pub fn scanning_root(self, root: &Path) {
        if self.chatty() {
            println!("Scanning directory: {}", root.display());
        }
    }

    pub fn skipping(self, path: &Path, age: Duration, threshold: Duration) {
        if self.chatty() {
            println!(
                "  Skipping {} (age: {}, threshold: {})",
                path.display(),
                format_age(age),
                format_age(threshold)
            );
        }
    }

    pub fn size_warning(self, path: &Path, err: &anyhow::Error) {
        if self.chatty() {
            println!(
                "  {} could not calculate size for {}: {err:#}",
                "Warning:".red().bold(),
                path.display()
            );
        }
    }

    pub fn would_remove(self, target: &TargetDir) {
        if self.quiet {
            return;
        }
        println!(
            "  {} Would remove: {} (age: {}, size: {})",
            "[DRY RUN]".yellow(),
            target.path.display(),
            format_age(target.age),
            format_size(target.size, BINARY)
        );
    }

    pub fn removed(self, target: &TargetDir) {
        if self.quiet {
            return;
        }
        println!(
            "  {} {} (age: {}, size: {})",
            "Removed:".green(),
            target.path.display(),
            format_age(target.age),
            format_size(target.size, BINARY)
        );
    }

    pub fn remove_failed(self, err: &anyhow::Error) {
        if !self.quiet {
            eprintln!("  {} {err:#}", "Error:".red().bold());
        }
    }

    pub fn root_error(self, root: &Path, err: &anyhow::Error) {
        if !self.quiet {
            eprintln!(
                "{} processing directory {}: {err:#}",
                "Error".red().bold(),
                root.display()
            );
        }
    }

    pub fn summary(self, totals: &RunTotals, config: &Config) {
        if self.quiet {
            return;
        }
        println!();
        if config.dry_run {
            println!("{}", "DRY RUN SUMMARY:".bold());
            println!(
                "Found {} node_modules directories older than {}",
                totals.found,
                format_age(config.age)
            );
            println!("Would free approximately {}", format_mb(totals.bytes));
        } else {
            println!("{}", "SUMMARY:".bold());
            println!(
                "Found {} node_modules directories older than {}",
                totals.found,
                format_age(config.age)
            );
            println!("Removed {} directories", totals.removed);
            println!("Freed approximately {}", format_mb(totals.bytes));
        }
    }
}

/// Mebibytes with two decimals, the unit the summary reports in.
#[allow(clippy::cast_precision_loss)]
pub fn format_mb(bytes: u64) -> String {
    format!("{:.2} MB", bytes as f64 / 1_048_576.0)
}

/// Renders a duration in the same `90d` / `1h30m` grammar the `--age` flag
/// accepts. Sub-second remainders are dropped.
pub fn format_age(age: Duration) -> String {
    let mut secs = age.as_secs();
    if secs == 0 {
        return "0s".to_string();
    }
    let mut out = String::new();
    for (unit, label) in [(86_400, "d"), (3_600, "h"), (60, "m"), (1, "s")] {
        let count = secs / unit;
        if count > 0 {
            out.push_str(&format!("{count}{label}"));
            secs %= unit;
        }
    }
    out
}
