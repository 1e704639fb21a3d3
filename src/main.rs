//! paperscreen - terminal screener for academic-conference paper catalogs.

use anyhow::{Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use paperscreen::config::{ScreenerConfig, SourceConfig};
use paperscreen::render::ui::{ColorTheme, TerminalUI};
use paperscreen::search::query_string::{self, SharedFilter};
use paperscreen::search::validate_query;
use paperscreen::{app, Application};
use std::fs::File;
use std::path::PathBuf;

fn build_cli() -> Command {
    Command::new("paperscreen")
        .version(paperscreen::VERSION)
        .about("Browse, search and filter academic-conference paper catalogs")
        .long_about(
            "paperscreen loads paper catalogs from CSV partitions (optionally compressed) and \
             lets you search titles and abstracts, filter by conference and page through \
             the results sorted by average rating.",
        )
        .arg(
            Arg::new("source")
                .help("Catalog partition, PATH[=CONFERENCE]; the conference defaults to the file name up to the first '.'")
                .value_name("SOURCE")
                .num_args(1..)
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("query")
                .short('q')
                .long("query")
                .value_name("TEXT")
                .help("Initial search query"),
        )
        .arg(
            Arg::new("filter")
                .long("filter")
                .value_name("STRING")
                .help("Shared filter string, e.g. \"?q=diffusion&conferences=iclr2026\""),
        )
        .arg(
            Arg::new("page-size")
                .long("page-size")
                .value_name("N")
                .help("Records added per page")
                .value_parser(value_parser!(usize)),
        )
        .arg(
            Arg::new("list")
                .long("list")
                .help("Print the first page of results instead of starting the interface")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("log-file")
                .long("log-file")
                .value_name("FILE")
                .help("Write logs to FILE (level from RUST_LOG, default info)")
                .value_parser(value_parser!(PathBuf)),
        )
}

fn init_logging(log_file: Option<&PathBuf>) -> Result<()> {
    // Without a log file only errors reach stderr so the interface stays clean
    let default_level = if log_file.is_some() { "info" } else { "error" };
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level));

    if let Some(path) = log_file {
        let file = File::create(path)
            .with_context(|| format!("cannot create log file {}", path.display()))?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }

    builder.init();
    Ok(())
}

fn resolve_config(matches: &ArgMatches) -> Result<ScreenerConfig> {
    let mut config = ScreenerConfig::load(matches.get_one::<PathBuf>("config").map(PathBuf::as_path))?;

    if let Some(sources) = matches.get_many::<String>("source") {
        config
            .sources
            .extend(sources.map(|arg| SourceConfig::from_arg(arg)));
    }

    if let Some(&page_size) = matches.get_one::<usize>("page-size") {
        if page_size == 0 {
            anyhow::bail!("--page-size must be positive");
        }
        config.page_size = page_size;
    }

    if config.sources.is_empty() {
        anyhow::bail!("No catalog sources: pass SOURCE paths or add [[sources]] to the configuration");
    }

    Ok(config)
}

fn resolve_filter(matches: &ArgMatches) -> Result<SharedFilter> {
    let mut filter = matches
        .get_one::<String>("filter")
        .map(|raw| query_string::decode(raw))
        .unwrap_or_default();
    if let Some(query) = matches.get_one::<String>("query") {
        filter.query = query.clone();
    }
    validate_query(&filter.query).context("invalid initial query")?;
    Ok(filter)
}

async fn list(config: &ScreenerConfig, filter: &SharedFilter) -> Result<()> {
    let (outcomes, view) = app::load_first_page(config, filter).await?;
    if let Some(summary) = app::failure_summary(&outcomes) {
        eprintln!("{}", summary);
    }

    for (index, record) in view.visible.iter().enumerate() {
        println!(
            "{:>4}  {:>6}  {:<10}  {}  {}",
            index + 1,
            record.display_rating(),
            record.conference.label(),
            record.title,
            record.link()
        );
    }
    eprintln!("Showing {} of {} papers", view.visible.len(), view.total);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let matches = build_cli().get_matches();
    init_logging(matches.get_one::<PathBuf>("log-file"))?;

    let config = resolve_config(&matches)?;
    let filter = resolve_filter(&matches)?;

    if matches.get_flag("list") {
        return list(&config, &filter).await;
    }

    let ui_renderer = Box::new(TerminalUI::with_theme(ColorTheme::from_name(config.theme))?);
    let mut app = Application::new(config, filter, ui_renderer);
    app.run().await?;

    Ok(())
}
