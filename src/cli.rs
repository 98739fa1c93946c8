use crate::constants::DEFAULT_AGE;
use crate::model::Config;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Remove node_modules older than this duration (e.g. 45s, 3m, 24h, 90d)
    #[arg(long, default_value = DEFAULT_AGE, value_parser = parse_age)]
    pub age: Duration,

    /// Comma-separated list of directories to scan (default: current directory)
    #[arg(long, value_name = "DIRS")]
    pub dirs: Option<String>,

    /// Show what would be deleted without actually deleting
    #[arg(long)]
    pub dry_run: bool,

    /// Show detailed output
    #[arg(short, long)]
    pub verbose: bool,

    /// Minimal output (good for cron)
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    pub fn into_config(self) -> Config {
        let mut roots = self.dirs.as_deref().map(split_dirs).unwrap_or_default();
        if roots.is_empty() {
            roots.push(PathBuf::from("."));
        }
        Config {
            roots,
            age: self.age,
            dry_run: self.dry_run,
            verbose: self.verbose,
            quiet: self.quiet,
        }
    }
}

/// Splits a comma-separated directory list, trimming whitespace and dropping
/// empty entries (a trailing comma must not become a scan of `""`).
fn split_dirs(raw: &str) -> Vec<PathBuf> {
    raw.split(',')
        .map(str::trim)
        .filter(|dir| !dir.is_empty())
        .map(PathBuf::from)
        .collect()
}

/// Parses an age string made of `<integer><unit>` segments, where the unit is
/// one of `s`, `m`, `h`, `d`, `w`. Segments sum, so `1h30m` is ninety minutes.
fn parse_age(raw: &str) -> Result<Duration, String> {
    let input = raw.trim();
    if input.is_empty() {
        return Err("empty duration".to_string());
    }

    let mut total: u64 = 0;
    let mut digits = String::new();
    for ch in input.chars() {
        if ch.is_ascii_digit() {
            digits.push(ch);
            continue;
        }
        let value: u64 = digits
            .parse()
            .map_err(|_| format!("invalid duration '{raw}': invalid number before '{ch}'"))?;
        let unit: u64 = match ch {
            's' => 1,
            'm' => 60,
            'h' => 3_600,
            'd' => 86_400,
            'w' => 604_800,
            _ => return Err(format!("invalid duration '{raw}': unknown unit '{ch}'")),
        };
        total = value
            .checked_mul(unit)
            .and_then(|secs| total.checked_add(secs))
            .ok_or_else(|| format!("invalid duration '{raw}': value out of range"))?;
        digits.clear();
    }
    if !digits.is_empty() {
        return Err(format!("invalid duration '{raw}': missing unit after '{digits}'"));
    }
    Ok(Duration::from_secs(total))
}
