mod config;
mod dispatch;
mod error;
mod extract;
mod fetch;
mod query;
mod utils;

pub use error::{Error, Result};

use clap::builder::RangedU64ValueParser;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use colored::Colorize;
use config::{Config, OutputFormat, SearchEngine, DEFAULT_USER_AGENT};
use dispatch::{ConsoleHandler, Dispatcher};
use fetch::HttpFetcher;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use utils::{banner, ensure_dir, log::init_tracing_subscriber};

fn cli() -> Command {
    Command::new(clap::crate_name!())
        .version(clap::crate_version!())
        .about("Run search engine dorks against target sites and list the links found")
        .arg(
            Arg::new("url")
                .short('u')
                .long("url")
                .value_name("SITES")
                .help("Target sites (comma-separated)")
                .required(true),
        )
        .arg(
            Arg::new("dork")
                .short('d')
                .long("dork")
                .value_name("DORK")
                .help("Dork query, e.g. 'filetype:pdf'")
                .required(true),
        )
        .arg(
            Arg::new("pages")
                .short('p')
                .long("pages")
                .value_name("PAGES")
                .help("Number of result pages per site")
                .value_parser(value_parser!(usize))
                .default_value("1"),
        )
        .arg(
            Arg::new("threads")
                .short('t')
                .long("threads")
                .value_name("THREADS")
                .help("Number of workers handling the links")
                .value_parser(RangedU64ValueParser::<usize>::new().range(1..))
                .default_value("4"),
        )
        .arg(
            Arg::new("user-agent")
                .long("ua")
                .visible_alias("user-agent")
                .value_name("USER_AGENT")
                .help("User-Agent header")
                .default_value(DEFAULT_USER_AGENT),
        )
        .arg(
            Arg::new("engine")
                .short('e')
                .long("engine")
                .value_name("ENGINE")
                .help("Search engine (Google, Bing, DuckDuckGo)")
                .default_value("Google"),
        )
        .arg(
            Arg::new("timeout")
                .long("timeout")
                .value_name("SECONDS")
                .help("Deadline of a single search request in seconds [default: 10]")
                .value_parser(value_parser!(u64).range(1..)),
        )
        .arg(
            Arg::new("max-body")
                .long("max-body")
                .value_name("BYTES")
                .help("Largest result page accepted [default: 5 MiB]")
                .value_parser(RangedU64ValueParser::<usize>::new().range(1..)),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("OUTPUT")
                .help("Output format")
                .value_parser(["text", "json"])
                .default_value("text"),
        )
        .arg(
            Arg::new("logs")
                .short('s')
                .long("logs")
                .action(ArgAction::SetTrue)
                .help("Save logs into a .log file"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::SetTrue)
                .help("Log every request"),
        )
        .arg(
            Arg::new("no-banner")
                .long("no-banner")
                .action(ArgAction::SetTrue)
                .help("Do not print the banner"),
        )
}

fn config_from_args(args: &ArgMatches) -> Result<Config> {
    let sites = args.get_one::<String>("url").map(String::as_str).unwrap_or_default();
    let dork = args.get_one::<String>("dork").map(String::as_str).unwrap_or_default();
    if dork.trim().is_empty() {
        return Err(Error::CliUsage("the dork query can't be empty".into()));
    }

    let pages = *args.get_one::<usize>("pages").unwrap_or(&1);
    let threads = *args.get_one::<usize>("threads").unwrap_or(&4);

    let mut config = Config::new(sites, dork, pages, threads);
    if config.sites.is_empty() {
        warn!("No target site given, nothing to search");
    }
    if let Some(user_agent) = args.get_one::<String>("user-agent") {
        config.user_agent = user_agent.clone();
    }
    if let Some(engine) = args.get_one::<String>("engine") {
        config.engine = SearchEngine::from_name(engine);
    }
    if let Some(timeout) = args.get_one::<u64>("timeout") {
        config.timeout = Duration::from_secs(*timeout);
    }
    if let Some(max_body) = args.get_one::<usize>("max-body") {
        config.max_body_bytes = *max_body;
    }
    if args.get_one::<String>("output").is_some_and(|format| format == "json") {
        config.output = OutputFormat::Json;
    }

    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli().get_matches();

    if !args.get_flag("no-banner") {
        eprintln!("{}", banner().blue());
    }

    // logs
    let save_logs = args.get_flag("logs");
    let timestamp = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs();
    let filename = format!("{}", timestamp);
    let output_dir = "output/dork-hound".to_string();
    if save_logs {
        ensure_dir(output_dir.as_ref())?;
    }
    init_tracing_subscriber(
        args.get_flag("verbose"),
        save_logs.then(|| (Path::new(&output_dir), filename.as_str())),
    );

    let config = config_from_args(&args)?;
    debug!("{:?}", config);

    let fetcher = Arc::new(HttpFetcher::new(&config)?);
    let handler = Arc::new(ConsoleHandler::new(config.output));

    // stop cleanly on Ctrl-C
    let cancel = CancellationToken::new();
    let ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, finishing queued links");
            ctrl_c.cancel();
        }
    });

    let dispatcher = Dispatcher::with_cancellation(&config, cancel);
    let summary = dispatcher.run(fetcher, handler).await;

    info!("Run summary: {}", serde_json::to_string(&summary)?);
    if summary.pages_failed > 0 {
        eprintln!(
            "{} of {} result pages could not be fetched",
            summary.pages_failed, summary.requests
        );
    }

    Ok(())
}
