use anyhow::Result;
use clap::{Parser, Subcommand};

use phish_setlists_lib::config::{AppConfig, ConfigStore};

/// Show calendar and setlists from phish.net.
#[derive(Parser, Debug)]
#[command(name = "phish-setlists", author, version, about, long_about = None)]
struct Args {
    /// phish.net API key (overrides PHISHNET_API_KEY and the config file)
    #[arg(long)]
    api_key: Option<String>,

    /// API base url
    #[arg(long)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the days of a month that had a show
    Days {
        /// Four digit year, defaults to this year
        #[arg(long)]
        year: Option<String>,

        /// Month number, defaults to this month
        #[arg(long)]
        month: Option<String>,
    },
    /// Print the setlist for one date
    Setlist {
        /// Show date as YYYY-MM-DD
        #[arg(long)]
        date: String,
    },
}

fn configure_logging() {
    use tracing_subscriber::prelude::*;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_line_number(true)
        .with_target(false)
        .with_file(true)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    configure_logging();
    let args = Args::parse();

    let config = ConfigStore::load().read().merge(AppConfig {
        api_key: args.api_key,
        base_url: args.base_url,
        artist: None,
    });

    run(args.command, &config).await
}

async fn run(command: Command, config: &AppConfig) -> Result<()> {
    let source = phish_setlists_lib::gateway(config)?;

    match command {
        Command::Days { year, month } => {
            let (year, month) =
                phish_setlists_lib::normalize_year_month(year.as_deref(), month.as_deref())?;
            let days = phish_setlists_lib::list_days(source, config, &year, &month).await?;
            if days.is_empty() {
                println!("no shows in {year}-{month}");
            }
            for day in days {
                println!("{day}");
            }
        }
        Command::Setlist { date } => {
            let date = phish_setlists_lib::normalize_date(&date)?;
            let view = phish_setlists_lib::show_setlist(source, &date).await?;
            if view.lines.is_empty() {
                println!("no setlist data yet for {date}");
                return Ok(());
            }
            if let Some(header) = &view.header {
                println!("{header}");
            }
            for section in &view.sets {
                println!();
                println!("{}:", section.title);
                for line in &section.lines {
                    println!("  {line}");
                }
            }
        }
    }
    Ok(())
}
