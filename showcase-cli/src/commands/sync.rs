//! The sync command. Compares source and target, then creates, updates and
//! re-associates on the target.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{builder::NonEmptyStringValueParser, Args};
use colored::Colorize;

use showcase_api::{ClientConfig, RemoteCkan};
use showcase_core::ShowcaseName;
use showcase_sync::{
    pipeline::{self, SyncScope},
    ShowcaseOutcome, ShowcaseSyncResult, ShowcaseUpdater, SyncOptions,
};

/// Arguments for a sync run.
#[derive(Args, Debug)]
pub struct SyncArgs {
    /// Base URL of the instance to copy from.
    #[arg(long, value_name = "URL", value_parser = NonEmptyStringValueParser::new())]
    pub source: String,

    /// Base URL of the instance to copy to.
    #[arg(long, value_name = "URL", value_parser = NonEmptyStringValueParser::new())]
    pub target: String,

    /// API key with write access on the target.
    #[arg(
        long,
        value_name = "API_KEY",
        env = "SHOWCASE_SYNC_TARGET_KEY",
        hide_env_values = true,
        value_parser = NonEmptyStringValueParser::new()
    )]
    pub target_key: String,

    /// Directory for images downloaded from the source.
    #[arg(long, value_name = "PATH", default_value = "/tmp/")]
    pub tmp_dir: PathBuf,

    /// Sync only this showcase instead of the whole source listing.
    #[arg(long, value_name = "NAME")]
    pub showcase: Option<String>,

    /// Show what would change without writing anything to the target.
    #[arg(long)]
    pub dry_run: bool,

    /// Per-request HTTP timeout in seconds.
    #[arg(long, value_name = "SECS", default_value_t = 60)]
    pub timeout: u64,
}

impl SyncArgs {
    pub fn run(self) -> Result<()> {
        let config = ClientConfig {
            timeout: Duration::from_secs(self.timeout),
            ..ClientConfig::default()
        };
        let source = RemoteCkan::with_config(&self.source, None, &config);
        let target = RemoteCkan::with_config(&self.target, Some(self.target_key.clone()), &config);
        let options = SyncOptions {
            tmp_dir: self.tmp_dir.clone(),
            dry_run: self.dry_run,
        };
        // Images are only ever downloaded from the source.
        let updater = ShowcaseUpdater::new(&source, &target, &source, options);

        let scope = match &self.showcase {
            Some(name) => SyncScope::Showcase(ShowcaseName::from(name.as_str())),
            None => SyncScope::All,
        };
        tracing::debug!(?scope, tmp_dir = %self.tmp_dir.display(), "starting sync");

        let results = pipeline::run(&updater, scope)
            .with_context(|| format!("sync from {} to {} failed", self.source, self.target))?;
        print_results(&results, self.dry_run);
        Ok(())
    }
}

fn print_results(results: &[ShowcaseSyncResult], dry_run: bool) {
    let prefix = if dry_run { "[dry-run] " } else { "" };

    if results.is_empty() {
        println!("{prefix}✓ no showcases on the source, nothing to do");
        return;
    }

    let count = |pred: fn(&ShowcaseOutcome) -> bool| {
        results.iter().filter(|r| pred(&r.outcome)).count()
    };
    let created = count(|o| {
        matches!(
            o,
            ShowcaseOutcome::Created | ShowcaseOutcome::WouldCreate
        )
    });
    let updated = count(|o| {
        matches!(
            o,
            ShowcaseOutcome::Updated { .. } | ShowcaseOutcome::WouldUpdate { .. }
        )
    });
    let unchanged = count(|o| !o.is_change());
    let dataset_changes: usize = results
        .iter()
        .map(|r| r.datasets.added.len() + r.datasets.removed.len())
        .sum();

    println!(
        "{prefix}✓ {} showcases ({created} created, {updated} updated, {unchanged} unchanged, {dataset_changes} association changes)",
        results.len(),
    );

    for r in results {
        match &r.outcome {
            ShowcaseOutcome::Created | ShowcaseOutcome::WouldCreate => {
                println!("  {}  {}", "+".green(), r.name)
            }
            ShowcaseOutcome::Updated { changed } | ShowcaseOutcome::WouldUpdate { changed } => {
                println!("  {}  {} ({})", "~".yellow(), r.name, changed.join(", "))
            }
            ShowcaseOutcome::Unchanged => println!("  ·  {}", r.name),
        }
        for dataset in &r.datasets.added {
            println!("       {} {dataset}", "+".green());
        }
        for dataset in &r.datasets.removed {
            println!("       {} {dataset}", "-".red());
        }
    }
}
