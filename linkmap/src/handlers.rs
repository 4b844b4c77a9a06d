use anyhow::Context;
use clap::ArgMatches;
use colored::Colorize;
use linkmap_core::crawl::{CrawlOptions, build_seed_urls, execute_crawl, generate_crawl_summary};
use linkmap_core::report::{ReportFormat, render_report, save_report, write_edge_table};
use linkmap_scanner::{CrawlResult, RedirectPolicy};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;
use url::Url;

// Helper functions for crawl handler

/// Collect seeds from every source given on the command line.
///
/// Explicit URLs come first, then `base` + each route, then the hosts
/// file. At least one source must yield a seed.
pub fn load_urls_from_source(
    urls: &[Url],
    base: Option<&Url>,
    paths: &[String],
    hosts_file: Option<&PathBuf>,
) -> Result<Vec<String>, String> {
    let mut seeds: Vec<String> = urls.iter().map(|url| url.as_str().to_string()).collect();

    if let Some(base) = base {
        seeds.extend(build_seed_urls(base.as_str(), paths));
    }

    if let Some(hosts_file_path) = hosts_file {
        seeds.extend(load_urls_from_file(hosts_file_path)?);
    }

    if seeds.is_empty() {
        return Err("Either --url, --base or --hosts-file must be provided".to_string());
    }

    Ok(seeds)
}

/// Load and parse URLs from a file
pub fn load_urls_from_file(path: &PathBuf) -> Result<Vec<String>, String> {
    let content = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read hosts file {}: {}", path.display(), e))?;

    let urls: Vec<String> = content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| parse_url_line(line.trim()))
        .collect();

    if urls.is_empty() {
        return Err(format!("No valid URLs found in {}", path.display()));
    }

    Ok(urls)
}

/// Parse a single line as a URL, trying to add http:// if needed
pub fn parse_url_line(line: &str) -> Option<String> {
    // Try to parse as-is
    if Url::parse(line).is_ok() {
        return Some(line.to_string());
    }

    // Try adding http://
    let with_scheme = format!("http://{}", line);
    if Url::parse(&with_scheme).is_ok() {
        return Some(with_scheme);
    }

    eprintln!("{}  Skipping invalid URL '{}'", "⚠".yellow(), line);
    None
}

/// Expand `~` in a user-supplied output directory.
pub fn resolve_output_dir(raw: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(raw).as_ref())
}

/// Everything the `crawl` subcommand needs, pulled out of clap's matches.
#[derive(Debug, Clone)]
pub struct CrawlCommand {
    pub seeds: Vec<String>,
    pub max_depth: usize,
    pub threads: usize,
    pub timeout_secs: u64,
    pub redirects: RedirectPolicy,
    pub output_dir: PathBuf,
    pub file_name: String,
    pub format: ReportFormat,
    pub report_path: Option<PathBuf>,
    pub quiet: bool,
}

impl CrawlCommand {
    pub fn from_matches(sub_matches: &ArgMatches, quiet: bool) -> Result<Self, String> {
        let urls: Vec<Url> = sub_matches
            .get_many::<Url>("url")
            .map(|values| values.cloned().collect())
            .unwrap_or_default();
        let paths: Vec<String> = sub_matches
            .get_many::<String>("path")
            .map(|values| values.cloned().collect())
            .unwrap_or_default();
        let base = sub_matches.get_one::<Url>("base");
        let hosts_file = sub_matches.get_one::<PathBuf>("hosts-file");

        let seeds = load_urls_from_source(&urls, base, &paths, hosts_file)?;

        let redirects = if sub_matches.get_flag("no-redirects") {
            RedirectPolicy::None
        } else {
            RedirectPolicy::Limited(*sub_matches.get_one::<usize>("max-redirects").unwrap_or(&5))
        };

        let format_name = sub_matches
            .get_one::<String>("format")
            .map(String::as_str)
            .unwrap_or("text");
        let format = ReportFormat::from_str(format_name)
            .ok_or_else(|| format!("Unknown format '{}'", format_name))?;

        Ok(Self {
            seeds,
            max_depth: *sub_matches.get_one::<usize>("max-depth").unwrap_or(&1),
            threads: *sub_matches.get_one::<usize>("threads").unwrap_or(&1),
            timeout_secs: *sub_matches.get_one::<u64>("timeout").unwrap_or(&10),
            redirects,
            output_dir: resolve_output_dir(
                sub_matches
                    .get_one::<String>("output-dir")
                    .map(String::as_str)
                    .unwrap_or("./static"),
            ),
            file_name: sub_matches
                .get_one::<String>("file-name")
                .cloned()
                .unwrap_or_else(|| "website_links.csv".to_string()),
            format,
            report_path: sub_matches.get_one::<PathBuf>("report").cloned(),
            quiet,
        })
    }
}

/// What a finished crawl left behind.
#[derive(Debug)]
pub struct CrawlOutcome {
    pub result: CrawlResult,
    pub edge_table: PathBuf,
    pub rendering: String,
}

/// Crawl, write the edge table, and render the requested view.
pub async fn run_crawl(command: &CrawlCommand) -> anyhow::Result<CrawlOutcome> {
    debug!("Running crawl: {:?}", command);

    let options = CrawlOptions {
        seeds: command.seeds.clone(),
        workers: command.threads,
        max_depth: command.max_depth,
        timeout_secs: command.timeout_secs,
        redirects: command.redirects,
        show_progress_bars: !command.quiet,
    };

    let progress_callback = if command.quiet {
        None
    } else {
        Some(Arc::new(|msg: String| {
            println!("{}", msg);
        }) as linkmap_core::crawl::CrawlProgressCallback)
    };

    let result = execute_crawl(options, progress_callback)
        .await
        .context("Crawl failed")?;

    let edge_table = write_edge_table(&result.graph, &command.output_dir, &command.file_name)
        .with_context(|| format!("Failed to write edge table to {}", command.output_dir.display()))?;

    let rendering = render_report(&result, command.format)
        .with_context(|| format!("Failed to render {} report", command.format.extension()))?;

    if let Some(ref report_path) = command.report_path {
        save_report(&rendering, report_path)
            .with_context(|| format!("Failed to save report to {}", report_path.display()))?;
    }

    Ok(CrawlOutcome {
        result,
        edge_table,
        rendering,
    })
}

fn print_divider() {
    println!("{}", "═".repeat(60).bright_blue().bold());
}

pub async fn handle_crawl(sub_matches: &ArgMatches, quiet: bool) {
    // Initialize tracing for logging
    tracing_subscriber::fmt::init();

    let command = match CrawlCommand::from_matches(sub_matches, quiet) {
        Ok(command) => command,
        Err(e) => {
            eprintln!("{} {}", "✗".red().bold(), e);
            std::process::exit(1);
        }
    };

    if !quiet {
        print_divider();
        println!("{}", "  LINKMAP CRAWL".bright_white().bold());
        print_divider();
        println!("Seeds: {}", command.seeds.len());
        println!("Workers: {}", command.threads);
        println!("Max depth: {}", command.max_depth);
        let redirect_str = match command.redirects {
            RedirectPolicy::None => "not followed".to_string(),
            RedirectPolicy::Limited(max) => format!("up to {}", max),
        };
        println!("Redirects: {}\n", redirect_str);
    }

    let outcome = match run_crawl(&command).await {
        Ok(outcome) => outcome,
        Err(e) => {
            eprintln!("{} {:#}", "✗".red().bold(), e);
            std::process::exit(1);
        }
    };

    if quiet {
        return;
    }

    println!();
    print!("{}", generate_crawl_summary(&outcome.result));
    println!(
        "{} Edge table: {}",
        "✓".green().bold(),
        outcome.edge_table.display().to_string().bright_white()
    );

    match command.report_path {
        Some(ref path) => println!(
            "{} Report: {}",
            "✓".green().bold(),
            path.display().to_string().bright_white()
        ),
        None => {
            println!();
            print!("{}", outcome.rendering);
        }
    }
}
