/*!
 * Command-line interface for extcopy
 */

use std::io;
use std::process;
use std::sync::Arc;
use std::time::Instant;

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info};

use extcopy::config::{Args, Config, ReportKind};
use extcopy::error::Result;
use extcopy::renderer::{RenderStyle, TreeRenderer};
use extcopy::report::{CopyReport, ReportFormat, Reporter};
use extcopy::utils::count_files;
use extcopy::walker::Walker;

fn main() {
    env_logger::init();

    if let Err(e) = run(Args::parse()) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let config = Config::from_args(args);

    // Nothing is touched on disk before this passes
    config.validate()?;
    info!(
        "Copying {} into {}",
        config.source_dir.display(),
        config.dest_dir.display()
    );

    let progress = ProgressBar::new(0);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} {wide_msg:.dim.white} {pos}/{len} ({percent}%) ⏱️  Elapsed: {elapsed_precise}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    progress.enable_steady_tick(std::time::Duration::from_millis(100));
    progress.set_prefix("📊 Setup");
    progress.set_message(format!(
        "📂 Counting files in {}",
        config.source_dir.display()
    ));

    let total_files = count_files(&config.source_dir, Some(config.dest_dir.as_path()));
    debug!("Found {} files to copy", total_files);

    progress.set_length(total_files);
    progress.set_prefix("📊 Copying");
    progress.set_message(format!("into {}", config.dest_dir.display()));

    let walker = Walker::new(config.clone(), Arc::new(progress.clone()));

    let start_time = Instant::now();
    walker.run()?;
    let duration = start_time.elapsed();

    progress.finish_and_clear();

    let style = if config.color {
        RenderStyle::colored()
    } else {
        RenderStyle::plain()
    };
    TreeRenderer::new(style).render(&config.dest_dir, &mut io::stdout().lock())?;

    let format = match config.report {
        ReportKind::Table => ReportFormat::ConsoleTable,
        ReportKind::Json => ReportFormat::Json,
        ReportKind::None => return Ok(()),
    };
    let report = CopyReport::new(
        config.source_dir.display().to_string(),
        config.dest_dir.display().to_string(),
        duration,
        walker.get_statistics(),
    );
    Reporter::new(format).print_report(&report)
}
