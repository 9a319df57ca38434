//! `lfnt`: download Google Fonts for self-hosting

use std::env;
use std::process::ExitCode;

use camino::Utf8PathBuf;
use eyre::{Result, eyre};
use facet::Facet;
use facet_args as args;
use localfont::css::{subset_ranges, templates};
use localfont::export::{self, CssMode};
use localfont::fetch::Fetcher;
use localfont::{FontId, FontSession, ResolvedConfig, process_all};
use owo_colors::OwoColorize;
use tracing_subscriber::prelude::*;

/// Fetch and inspect stylesheets
#[derive(Facet, Debug)]
struct ProcessArgs {
    /// Google Fonts stylesheet URLs, one font slot each
    #[facet(args::positional, default)]
    urls: Vec<String>,
}

/// Export a stylesheet
#[derive(Facet, Debug)]
struct CssArgs {
    /// Google Fonts stylesheet URL
    #[facet(args::positional)]
    url: String,

    /// Point font URLs at locally hosted copies
    #[facet(args::named, args::short = 'l')]
    local: bool,

    /// Embed the font files as base64 data URLs
    #[facet(args::named, args::short = 'i')]
    inline: bool,

    /// Output directory (default: current directory)
    #[facet(args::named, args::short = 'o', default)]
    out: Option<String>,
}

/// Download the WOFF2 files of a stylesheet as a zip archive
#[derive(Facet, Debug)]
struct DownloadArgs {
    /// Google Fonts stylesheet URL
    #[facet(args::positional)]
    url: String,

    /// Output directory (default: current directory)
    #[facet(args::named, args::short = 'o', default)]
    out: Option<String>,
}

/// Print unicode ranges covering a text sample
#[derive(Facet, Debug)]
struct SubsetArgs {
    /// Text to cover (default: the configured sample text)
    #[facet(args::positional, default)]
    text: Vec<String>,

    /// Use a built-in sample: pangram, alphabet, numbers, special, paragraph
    #[facet(args::named, args::short = 't', default)]
    template: Option<String>,
}

/// Print a Tailwind config for one or more fonts
#[derive(Facet, Debug)]
struct TailwindArgs {
    #[facet(args::positional, default)]
    urls: Vec<String>,
}

#[derive(Facet, Debug)]
#[repr(u8)]
enum Command {
    /// Fetch stylesheets and show what they contain
    Process(ProcessArgs),
    /// Write the stylesheet, optionally rewritten or inlined
    Css(CssArgs),
    /// Download all WOFF2 files into <name>-fonts.zip
    Download(DownloadArgs),
    /// Compute unicode-range subsets
    Subset(SubsetArgs),
    /// Generate a Tailwind fontFamily config
    Tailwind(TailwindArgs),
}

#[derive(Facet, Debug)]
struct Args {
    /// Config file (default: discover .config/localfont.yaml)
    #[facet(args::named, args::short = 'c', default)]
    config: Option<String>,

    #[facet(args::subcommand)]
    command: Command,
}

fn parse_args() -> Result<Args, String> {
    let args: Vec<String> = env::args().skip(1).collect();
    let args_refs: Vec<&str> = args.iter().map(|s| s.as_str()).collect();

    facet_args::from_slice(&args_refs).map_err(|e| {
        eprintln!("{:?}", miette::Report::new(e));
        "Failed to parse arguments".to_string()
    })
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("localfont=info,localfont_fetch=info"));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact();
    tracing_subscriber::registry()
        .with(fmt_layer.with_filter(filter))
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .build(),
        )
    }))
    .ok();

    let args = match parse_args() {
        Ok(a) => a,
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = color_eyre::install() {
        eprintln!("{}: {e}", "error".red().bold());
    }
    init_tracing();

    match run(args).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {e:?}", "error".red().bold());
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<ExitCode> {
    let config = match &args.config {
        Some(path) => ResolvedConfig::load(&Utf8PathBuf::from(path))?,
        None => ResolvedConfig::discover()?,
    };

    match args.command {
        Command::Process(cmd) => cmd_process(&config, &cmd.urls).await,
        Command::Css(cmd) => cmd_css(&config, cmd).await,
        Command::Download(cmd) => cmd_download(&config, cmd).await,
        Command::Subset(cmd) => cmd_subset(&config, cmd),
        Command::Tailwind(cmd) => cmd_tailwind(&config, &cmd.urls).await,
    }
}

fn fetcher(config: &ResolvedConfig) -> Result<Fetcher> {
    let fetcher = Fetcher::new(config.fetch_options())?;

    // Ctrl-C aborts whatever is in flight
    let token = fetcher.cancellation_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupted, cancelling requests");
            token.cancel();
        }
    });
    Ok(fetcher)
}

/// One slot per URL, processed concurrently
async fn load_session(
    config: &ResolvedConfig,
    fetcher: &Fetcher,
    urls: &[String],
) -> Result<(FontSession, Vec<FontId>)> {
    if urls.is_empty() {
        return Err(eyre!("no stylesheet URL given"));
    }

    let mut session = FontSession::new(config.sample_text.clone());
    let mut ids = Vec::with_capacity(urls.len());
    for url in urls {
        let id = session.add_font();
        session.set_source_url(id, url.clone())?;
        ids.push(id);
    }
    process_all(&mut session, fetcher, &ids).await;
    Ok((session, ids))
}

/// Load a single URL, failing if it can't be processed
async fn load_one(
    config: &ResolvedConfig,
    fetcher: &Fetcher,
    url: &str,
) -> Result<(FontSession, FontId)> {
    let (session, ids) = load_session(config, fetcher, &[url.to_string()]).await?;
    let id = ids[0];
    if let Some(error) = session.get(id).and_then(|r| r.last_error()) {
        return Err(eyre!("{error}"));
    }
    Ok((session, id))
}

fn out_dir(out: Option<String>) -> Utf8PathBuf {
    out.map(Utf8PathBuf::from).unwrap_or_else(|| Utf8PathBuf::from("."))
}

async fn cmd_process(config: &ResolvedConfig, urls: &[String]) -> Result<ExitCode> {
    let fetcher = fetcher(config)?;
    let (session, _) = load_session(config, &fetcher, urls).await?;

    let mut failed = false;
    for record in session.records().iter() {
        println!("{} {}", record.id().dimmed(), record.source_url());
        if let Some(error) = record.last_error() {
            failed = true;
            println!("  {}: {}", "error".red().bold(), error);
            continue;
        }
        println!("  {:<10} {}", "family".bold(), record.display_name().cyan());
        println!("  {:<10} {}", "weights".bold(), record.declared_weights().join(", "));
        println!(
            "  {:<10} {}",
            "variable".bold(),
            if record.is_variable_font() { "yes" } else { "no" }
        );
        if let Some(settings) = record.variable_axes().font_variation_settings() {
            println!("  {:<10} {}", "axes".bold(), settings);
        }
        println!("  {:<10} ~{} KB", "size".bold(), record.estimated_size_kb());
        println!("  {:<10} {}", "subset".bold(), record.subset_ranges());
    }

    Ok(if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

async fn cmd_css(config: &ResolvedConfig, cmd: CssArgs) -> Result<ExitCode> {
    if cmd.local && cmd.inline {
        return Err(eyre!("--local and --inline are mutually exclusive"));
    }
    let mode = if cmd.local {
        CssMode::LocalPaths {
            prefix: config.local_prefix.clone(),
        }
    } else if cmd.inline {
        CssMode::Inlined
    } else {
        CssMode::Original
    };

    let fetcher = fetcher(config)?;
    let (session, id) = load_one(config, &fetcher, &cmd.url).await?;
    let record = session
        .get(id)
        .ok_or_else(|| eyre!("font slot disappeared"))?;

    let css = export::render_css(&fetcher, record, &mode).await?;
    let path = export::write_css(&out_dir(cmd.out), record, &css)?;
    println!("{} {}", "wrote".green().bold(), path);
    Ok(ExitCode::SUCCESS)
}

async fn cmd_download(config: &ResolvedConfig, cmd: DownloadArgs) -> Result<ExitCode> {
    let fetcher = fetcher(config)?;
    let (session, id) = load_one(config, &fetcher, &cmd.url).await?;
    let record = session
        .get(id)
        .ok_or_else(|| eyre!("font slot disappeared"))?;

    let archive = export::download_fonts(&fetcher, record).await?;
    let path = export::write_archive(&out_dir(cmd.out), &archive)?;
    println!(
        "{} {} ({} files)",
        "wrote".green().bold(),
        path,
        archive.entries.len()
    );
    Ok(ExitCode::SUCCESS)
}

fn cmd_subset(config: &ResolvedConfig, cmd: SubsetArgs) -> Result<ExitCode> {
    let text = match (&cmd.template, cmd.text.is_empty()) {
        (Some(name), true) => templates::by_name(name)
            .ok_or_else(|| eyre!("unknown template '{name}'"))?
            .to_string(),
        (Some(_), false) => return Err(eyre!("pass either text or --template, not both")),
        (None, false) => cmd.text.join(" "),
        (None, true) => config.sample_text.clone(),
    };

    println!("{}", subset_ranges(&text));
    Ok(ExitCode::SUCCESS)
}

async fn cmd_tailwind(config: &ResolvedConfig, urls: &[String]) -> Result<ExitCode> {
    let fetcher = fetcher(config)?;
    let (session, _) = load_session(config, &fetcher, urls).await?;

    let mut failed = false;
    for record in session.records().iter() {
        if let Some(error) = record.last_error() {
            failed = true;
            eprintln!("{}: {}: {}", "error".red().bold(), record.source_url(), error);
        }
    }

    print!("{}", export::tailwind_for(&session));
    Ok(if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}
