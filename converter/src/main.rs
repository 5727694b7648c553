//! Prime Exchange Converter Binary
//!
//! Converts an amount across a currency corridor, compares transfer providers
//! and keeps the figures fresh until stopped.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use url::Url;

use primex_common::CurrencyCode;
use primex_converter::commands::HELP;
use primex_converter::render;
use primex_converter::{Command, Converter, ConverterConfig, CorridorState, Trigger};
use primex_fx::{
    FxResult, MidRateTable, NoJitter, RandomJitter, Roster, TableRateSource, ValuationEngine,
    ValuationResult,
};

/// Prime Exchange converter CLI
#[derive(Parser, Debug)]
#[command(name = "converter")]
#[command(about = "Currency converter with transfer provider comparison")]
struct Args {
    /// Shared link or its query string, e.g. "amount=250&from=GBP&to=JPY"
    #[arg(short, long)]
    query: Option<String>,

    /// Amount to convert (overrides the link)
    #[arg(short, long)]
    amount: Option<String>,

    /// Base currency (overrides the link)
    #[arg(long)]
    from: Option<CurrencyCode>,

    /// Quote currency (overrides the link)
    #[arg(long)]
    to: Option<CurrencyCode>,

    /// Mark the session as an embedded view
    #[arg(long)]
    embed: bool,

    /// Random seed for reproducible rate movement
    #[arg(long)]
    seed: Option<u64>,

    /// Serve table rates without simulated movement
    #[arg(long, conflicts_with = "seed")]
    no_jitter: bool,

    /// JSON rate table to use instead of the built-in one
    #[arg(long)]
    rates: Option<PathBuf>,

    /// Refresh interval in seconds
    #[arg(long)]
    refresh_secs: Option<u64>,

    /// Compute once and exit
    #[arg(long)]
    once: bool,

    /// Print results as JSON
    #[arg(long)]
    json: bool,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = ConverterConfig::from_env();
    if let Some(secs) = args.refresh_secs {
        config.refresh_interval = Duration::from_secs(secs);
    }

    // Initialize logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.clone()));
    let fmt_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);
    if args.json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer.json())
            .init();
    } else {
        tracing_subscriber::registry().with(filter).with(fmt_layer).init();
    }

    info!("Starting Prime Exchange converter");

    if let Err(e) = config.validate() {
        error!(error = %e, "Invalid configuration");
        return Err(anyhow::anyhow!("Configuration error: {}", e));
    }

    let table = match &args.rates {
        Some(path) => MidRateTable::from_json(&std::fs::read_to_string(path)?)?,
        None => MidRateTable::builtin(),
    };
    info!(pairs = table.len(), "Rate table loaded");

    let source = TableRateSource::new(table).with_band(config.jitter_band);
    let source = if args.no_jitter {
        source.with_jitter(NoJitter)
    } else if let Some(seed) = args.seed {
        source.with_jitter(RandomJitter::seeded(seed))
    } else {
        source
    };

    let share_base = config.share_url()?;
    let initial = initial_state(&args, &config);
    let converter = Converter::new(
        Box::new(source),
        ValuationEngine::new().with_broker_margin(config.broker_margin),
        Roster::builtin(),
        share_base,
        initial,
    );

    // Command line overrides go through the same edit path as the prompt.
    if let Some(amount) = &args.amount {
        converter.set_amount(amount);
    }
    if let Some(from) = args.from {
        converter.set_base(from);
    }
    if let Some(to) = args.to {
        converter.set_quote(to);
    }

    show(&converter, converter.compute(Trigger::Startup), args.json)?;

    if args.once {
        return Ok(());
    }

    info!(
        refresh_secs = config.refresh_interval.as_secs(),
        "Converter running, type `help` for commands"
    );

    let period = config.refresh_interval;
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                show(&converter, converter.compute(Trigger::Refresh), args.json)?;
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                if line.trim().is_empty() {
                    continue;
                }
                match line.parse::<Command>() {
                    Ok(Command::Quit) => break,
                    Ok(command) => handle(&converter, command, args.json)?,
                    Err(e) => println!("{e}"),
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Shutdown signal received");
                break;
            }
        }
    }

    info!(link = %converter.share_url(), "Converter stopped");
    Ok(())
}

fn initial_state(args: &Args, config: &ConverterConfig) -> CorridorState {
    let state = match &args.query {
        Some(link) => match Url::parse(link) {
            Ok(url) => CorridorState::from_url(&url, &config.defaults),
            Err(_) => CorridorState::decode(link, &config.defaults),
        },
        None => config.defaults.state(),
    };
    if args.embed {
        state.with_embed(true)
    } else {
        state
    }
}

fn handle(converter: &Converter, command: Command, json: bool) -> anyhow::Result<()> {
    match command {
        Command::Amount(raw) => {
            converter.set_amount(&raw);
            show(converter, converter.compute(Trigger::Edit), json)?;
        }
        Command::From(code) => {
            converter.set_base(code);
            show(converter, converter.compute(Trigger::Edit), json)?;
        }
        Command::To(code) => {
            converter.set_quote(code);
            show(converter, converter.compute(Trigger::Edit), json)?;
        }
        Command::Swap => show(converter, converter.swap(), json)?,
        Command::Convert => show(converter, converter.compute(Trigger::Convert), json)?,
        Command::Link => println!("{}", converter.share_url()),
        Command::Embed => println!("{}", converter.embed_url()),
        Command::Alert { email, threshold } => match converter.request_alert(&email, &threshold) {
            Ok(alert) => println!(
                "Alert noted for {} at {}. A backend hook can process it later.",
                alert.pair, alert.threshold
            ),
            Err(e) => println!("{}: {}", e.field(), e),
        },
        Command::Json => match converter.last_result() {
            Some(result) => println!("{}", serde_json::to_string_pretty(&result)?),
            None => println!("Nothing computed yet."),
        },
        Command::Help => println!("{HELP}"),
        Command::Quit => {}
    }
    Ok(())
}

fn show(
    converter: &Converter,
    outcome: FxResult<ValuationResult>,
    json: bool,
) -> anyhow::Result<()> {
    match outcome {
        Ok(result) if json => println!("{}", serde_json::to_string_pretty(&result)?),
        Ok(result) => {
            println!("{}", render::report(&result, converter.roster()));
            println!("Share: {}", converter.share_url());
        }
        Err(e) if e.is_unavailable() => println!("Pair not available in demo."),
        Err(e) => println!("{e}"),
    }
    Ok(())
}
