use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use linkcheckr_client::{AnyRenderer, HtmlLinkExtractor, HttpProber, RendererKind};
use linkcheckr_core::{CheckConfig, CheckRequest, CheckService, Report};

const EXIT_BROKEN: u8 = 1;
const EXIT_ERROR: u8 = 2;

#[derive(Parser)]
#[command(name = "linkcheckr", version, about = "Find broken links on a web page")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a page, probe every link on it and report the broken ones
    Check {
        /// Page to check
        #[arg(short, long)]
        url: String,

        /// Seconds to let client-side scripts run before links are read
        #[arg(short, long)]
        wait_time: Option<f64>,

        /// Rendering engine: "browser" (headless Chromium) or "http" (no scripts)
        #[arg(short, long, env = "LINKCHECKR_RENDERER", default_value_t = RendererKind::default())]
        renderer: RendererKind,

        /// Per-link probe timeout in seconds
        #[arg(short, long, env = "LINKCHECKR_PROBE_TIMEOUT_SECS", default_value_t = 5)]
        timeout: u64,

        /// Maximum number of links probed at once
        #[arg(short, long, env = "LINKCHECKR_CONCURRENCY", default_value_t = 16)]
        concurrency: usize,

        /// Give up on links still being probed after this many seconds
        #[arg(short, long, env = "LINKCHECKR_DEADLINE_SECS")]
        deadline: Option<u64>,

        /// Page navigation timeout in seconds
        #[arg(long, env = "LINKCHECKR_NAV_TIMEOUT_SECS", default_value_t = 30)]
        nav_timeout: u64,

        /// Browser tabs kept open at once
        #[arg(long, env = "LINKCHECKR_MAX_TABS", default_value_t = 4)]
        max_tabs: usize,

        /// Print the report as JSON instead of a summary
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();

    if let Ok(directive) = "linkcheckr=info".parse() {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env().add_directive(directive))
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }

    let cli = Cli::parse();

    match run(cli).await {
        Ok(report) if report.has_broken_links() => ExitCode::from(EXIT_BROKEN),
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::from(EXIT_ERROR)
        }
    }
}

async fn run(cli: Cli) -> Result<Report> {
    match cli.command {
        Commands::Check {
            url,
            wait_time,
            renderer,
            timeout,
            concurrency,
            deadline,
            nav_timeout,
            max_tabs,
            json,
        } => {
            let request = CheckRequest::from_parts(Some(&url), wait_time)?;

            let mut config = CheckConfig::default().with_concurrency(concurrency);
            if let Some(secs) = deadline {
                config = config.with_deadline(Duration::from_secs(secs));
            }

            let report = cmd_check(
                &request,
                renderer,
                Duration::from_secs(timeout),
                Duration::from_secs(nav_timeout),
                max_tabs,
                config,
            )
            .await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_summary(&report);
            }
            Ok(report)
        }
    }
}

async fn cmd_check(
    request: &CheckRequest,
    renderer: RendererKind,
    probe_timeout: Duration,
    nav_timeout: Duration,
    max_tabs: usize,
    config: CheckConfig,
) -> Result<Report> {
    // The CLI runs on the user's own machine, so local targets are fair game.
    let renderer = AnyRenderer::build(renderer, nav_timeout, max_tabs.max(1), true)
        .await
        .context("Failed to start renderer")?;
    let prober = HttpProber::with_timeout(probe_timeout)
        .context("Failed to create HTTP client")?
        .allow_private_urls();

    let service = CheckService::with_config(renderer, HtmlLinkExtractor::new(), prober, config);

    tracing::info!("Checking {}", request.target_url());
    let report = service.check(request).await?;
    Ok(report)
}

fn print_summary(report: &Report) {
    println!("Checked {}", report.url_checked);
    println!(
        "{} links: {} working, {} broken",
        report.summary.total, report.summary.working, report.summary.broken
    );

    if report.broken_links.is_empty() {
        return;
    }

    println!();
    println!("Broken links:");
    for link in &report.broken_links {
        println!("  [{}] {}", link.status(), link.url());
    }
}
