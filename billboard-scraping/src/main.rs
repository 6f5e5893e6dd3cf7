use std::{io::Write, path::PathBuf};

use billboard_scraping::{
    browser::ChromeRenderer,
    chart::{ChartClient, PeriodGranularity},
    config::Config,
    data_collector::{resolve_into_json, scrape_into_log},
    interrupt::{self, Interrupt, Interrupted},
    resolved_json::ArrayStyle,
    song_log::read_unique_songs,
    soundcloud::SearchUrlResolver,
};
use clap::{Args, Parser, Subcommand, ValueEnum};
use log::{info, LevelFilter};

#[derive(Parser)]
struct Opts {
    /// TOML file overriding base URLs, output directory and browser settings
    #[arg(long)]
    config_path: Option<PathBuf>,
    /// Reads and writes `{output_dir}/{name}.txt` and `{output_dir}/{name}.json`
    #[arg(long, default_value = "default")]
    name: String,
    #[command(subcommand)]
    sub: Sub,
}

#[derive(Subcommand)]
enum Sub {
    /// Append chart blocks for a range of periods to the song log
    Scrape(ScrapeArgs),
    /// Look up every unique song of the log on SoundCloud and write the JSON file
    Resolve(ResolveArgs),
    /// `scrape`, then `resolve`
    Run {
        #[command(flatten)]
        scrape: ScrapeArgs,
        #[command(flatten)]
        resolve: ResolveArgs,
    },
    /// Print the unique songs of the log
    List,
}

#[derive(Clone, Copy, ValueEnum)]
enum Granularity {
    Month,
    Year,
}

#[derive(Args)]
struct ScrapeArgs {
    start_year: i32,
    #[arg(long, default_value_t = 2021)]
    end_year: i32,
    #[arg(long, value_enum, default_value = "year")]
    granularity: Granularity,
    #[arg(long, default_value_t = 1)]
    start_month: u32,
    #[arg(long, default_value_t = 12)]
    end_month: u32,
    /// Day of month of the weekly chart
    #[arg(long, default_value_t = 1)]
    day: u32,
    /// Number of rows taken from each weekly chart
    #[arg(long, default_value_t = 5)]
    top: usize,
}
impl ScrapeArgs {
    fn granularity(&self) -> PeriodGranularity {
        match self.granularity {
            Granularity::Month => PeriodGranularity::ByMonth {
                months: self.start_month..=self.end_month,
                day: self.day,
                top: self.top,
            },
            Granularity::Year => PeriodGranularity::ByYear,
        }
    }
}

#[derive(Args)]
struct ResolveArgs {
    /// Omit the comma after the last object
    #[arg(long)]
    strict_json: bool,
    #[arg(long)]
    render_timeout_ms: Option<u64>,
    /// Show the browser window
    #[arg(long)]
    headed: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::builder()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .target(env_logger::Target::Stdout)
        .init();
    let opts = Opts::parse();
    let config = Config::load(opts.config_path.as_deref())?;
    let interrupt = Interrupt::install()?;

    match run(&opts, config, interrupt).await {
        Err(e) if e.downcast_ref::<Interrupted>().is_some() => {
            info!("Aborted by user");
            std::process::exit(interrupt::EXIT_CODE);
        }
        res => res,
    }
}

async fn run(opts: &Opts, config: Config, interrupt: Interrupt) -> anyhow::Result<()> {
    match &opts.sub {
        Sub::Scrape(args) => scrape(opts, &config, args, &interrupt).await,
        Sub::Resolve(args) => resolve(opts, config, args, interrupt),
        Sub::Run { scrape: s, resolve: r } => {
            scrape(opts, &config, s, &interrupt).await?;
            resolve(opts, config, r, interrupt)
        }
        Sub::List => {
            let mut stdout = std::io::stdout().lock();
            for song in read_unique_songs(config.log_path(&opts.name))? {
                writeln!(stdout, "{song}")?;
            }
            Ok(())
        }
    }
}

async fn scrape(
    opts: &Opts,
    config: &Config,
    args: &ScrapeArgs,
    interrupt: &Interrupt,
) -> anyhow::Result<()> {
    let log_path = config.log_path(&opts.name);
    let client = ChartClient::new(&config.chart)?;
    let count = scrape_into_log(
        &client,
        &config.chart,
        &args.granularity(),
        args.start_year..=args.end_year,
        &log_path,
        interrupt,
    )
    .await?;
    info!("Appended {count} chart blocks to {log_path:?}");
    Ok(())
}

fn resolve(
    opts: &Opts,
    mut config: Config,
    args: &ResolveArgs,
    interrupt: Interrupt,
) -> anyhow::Result<()> {
    if let Some(timeout) = args.render_timeout_ms {
        config.browser.render_timeout_ms = timeout;
    }
    if args.headed {
        config.browser.headless = false;
    }
    let style = if args.strict_json {
        ArrayStyle::Strict
    } else {
        ArrayStyle::TrailingComma
    };
    let renderer = ChromeRenderer::launch(&config.browser, interrupt.clone())?;
    let resolver = SearchUrlResolver::new(renderer, config.search.clone());
    resolve_into_json(
        &resolver,
        &config.log_path(&opts.name),
        &config.json_path(&opts.name),
        style,
        &interrupt,
    )?;
    Ok(())
}
