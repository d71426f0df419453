//! Command Line Interface for the token launch pool.
mod config;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use clmm_launch_domain::entities::pool::PoolHandle;
use clmm_launch_domain::fees::FeeTier;
use clmm_launch_domain::token::TokenAmount;
use clmm_launch_domain::value_objects::price::Price;
use clmm_launch_domain::value_objects::sqrt_price::SqrtPriceX96;
use clmm_launch_domain::value_objects::tick::Tick;
use clmm_launch_protocols::clock::SystemClock;
use clmm_launch_simulation::prelude::*;
use config::LaunchConfig;
use dotenv::dotenv;
use prettytable::{Table, row};
use rust_decimal::Decimal;
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "clmm-launch")]
#[command(about = "Token launch pool deployment and swap scenarios", long_about = None)]
struct Cli {
    /// Emit reports as JSON instead of tables
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug, Clone, Default)]
struct LaunchArgs {
    /// Native funding in whole units (overrides CLMM_LAUNCH_FUNDING)
    #[arg(long)]
    funding: Option<Decimal>,

    /// Token supply in whole tokens (overrides CLMM_LAUNCH_SUPPLY)
    #[arg(long)]
    supply: Option<u64>,

    /// Fee tier in pips: 500, 3000 or 10000 (overrides CLMM_LAUNCH_FEE_TIER)
    #[arg(long)]
    fee: Option<u32>,

    /// Token decimals (overrides CLMM_LAUNCH_DECIMALS)
    #[arg(long)]
    decimals: Option<u8>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ScheduleKind {
    /// Alternating sells and buys of growing size
    Ladder,
    /// Seeded random directions and log-normal sizes
    Random,
}

#[derive(Subcommand)]
enum Commands {
    /// Deploy the launch pool and print its opening price
    Launch {
        #[command(flatten)]
        launch: LaunchArgs,
    },
    /// Deploy the launch pool and run a swap schedule against it
    Simulate {
        #[command(flatten)]
        launch: LaunchArgs,

        /// Swap schedule to run
        #[arg(long, value_enum, default_value_t = ScheduleKind::Ladder)]
        schedule: ScheduleKind,

        /// Number of swaps of the random schedule
        #[arg(long, default_value_t = 48)]
        steps: usize,

        /// Seed of the random schedule (overrides CLMM_LAUNCH_SEED)
        #[arg(long)]
        seed: Option<u64>,
    },
}

/// Deployment outcome printed by `launch`.
#[derive(Debug, Serialize)]
struct LaunchSummary {
    pool: PoolHandle,
    token: String,
    native_funding: TokenAmount,
    token_balance: TokenAmount,
    liquidity: u128,
    price: Price,
    sqrt_price: SqrtPriceX96,
    tick: Tick,
}

fn resolve_config(args: &LaunchArgs, seed: Option<u64>) -> Result<LaunchConfig> {
    let mut config = LaunchConfig::from_env().context("loading launch configuration")?;
    if let Some(funding) = args.funding {
        config.funding = funding;
    }
    if let Some(supply) = args.supply {
        config.supply = supply;
    }
    if let Some(pips) = args.fee {
        config.fee_tier = FeeTier::from_pips(pips)
            .with_context(|| format!("invalid --fee {pips}"))?;
    }
    if let Some(decimals) = args.decimals {
        config.decimals = decimals;
    }
    if let Some(seed) = seed {
        config.seed = seed;
    }
    Ok(config)
}

async fn launch(config: &LaunchConfig) -> Result<(LaunchEnvironment, PoolHandle)> {
    let env = LaunchEnvironment::bootstrap(config.environment(), Arc::new(SystemClock))
        .await
        .context("bootstrapping launch environment")?;
    let handle = env
        .launch(config.funding_amount()?)
        .await
        .context("deploying launch pool")?;
    Ok((env, handle))
}

fn human(amount: TokenAmount, decimals: u8) -> String {
    amount
        .to_decimal(decimals)
        .map(|d| d.normalize().to_string())
        .unwrap_or_else(|_| amount.to_string())
}

fn decimal_price(price: Price) -> String {
    price
        .to_decimal()
        .map(|d| d.normalize().to_string())
        .unwrap_or_else(|_| price.to_string())
}

fn print_launch(summary: &LaunchSummary, decimals: u8) {
    println!("\n🚀 Launch Pool Deployed");
    let mut table = Table::new();
    table.add_row(row!["Pool", summary.pool]);
    table.add_row(row!["Token", summary.token]);
    table.add_row(row!["Native funding", human(summary.native_funding, 18)]);
    table.add_row(row!["Token balance", human(summary.token_balance, decimals)]);
    table.add_row(row!["Liquidity", summary.liquidity]);
    table.add_row(row!["Effective price", decimal_price(summary.price)]);
    table.add_row(row!["Sqrt price (Q64.96)", summary.sqrt_price]);
    table.add_row(row!["Tick", summary.tick]);
    table.printstd();
}

fn print_scenario(report: &ScenarioReport, decimals: u8) {
    println!("\n📈 Swap Operations");
    let mut table = Table::new();
    table.set_titles(row!["#", "Side", "Amount in", "Amount out", "Price", "Tick", "Status"]);
    for record in &report.records {
        let input_decimals = match record.direction {
            SwapDirection::Sell => decimals,
            SwapDirection::Buy => 18,
        };
        let output_decimals = match record.direction {
            SwapDirection::Sell => 18,
            SwapDirection::Buy => decimals,
        };
        table.add_row(row![
            record.index,
            record.direction,
            human(record.amount_in, input_decimals),
            record
                .amount_out
                .map_or_else(|| "-".to_string(), |out| human(out, output_decimals)),
            decimal_price(record.observation.price),
            record.observation.tick,
            record.error.as_deref().unwrap_or("ok")
        ]);
    }
    table.printstd();

    let summary = &report.summary;
    println!("\n📊 Scenario Summary");
    println!("════════════════════════════════════");
    println!("Swaps:          {} ({} failed)", summary.total_swaps, summary.failed);
    println!("Sells / Buys:   {} / {}", summary.sells, summary.buys);
    println!("Opening price:  {}", decimal_price(summary.first_price));
    println!("Closing price:  {}", decimal_price(summary.last_price));
    println!("Min price:      {}", decimal_price(summary.min_price));
    println!("Max price:      {}", decimal_price(summary.max_price));
    println!("Net tick move:  {}", summary.net_tick_move);
    println!("════════════════════════════════════");
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Launch { launch: args } => {
            let config = resolve_config(&args, None)?;
            let (env, handle) = launch(&config).await?;
            let state = env.manager.state().await;
            let seen = env.observe().await.context("reading launch price")?;
            let summary = LaunchSummary {
                pool: handle,
                token: env.config.token_symbol.clone(),
                native_funding: state.native_funding,
                token_balance: state.token_balance,
                liquidity: state.liquidity,
                price: seen.price,
                sqrt_price: seen.sqrt_price,
                tick: seen.tick,
            };
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                print_launch(&summary, config.decimals);
            }
        }
        Commands::Simulate {
            launch: args,
            schedule,
            steps,
            seed,
        } => {
            let config = resolve_config(&args, seed)?;
            let (env, handle) = launch(&config).await?;
            info!(pool = %handle, ?schedule, "Running scenario");

            let mut schedule: Box<dyn SwapSchedule> = match schedule {
                ScheduleKind::Ladder => Box::new(LadderSchedule::new(config.decimals, 18)),
                ScheduleKind::Random => Box::new(
                    RandomSchedule::new(config.seed, steps).with_decimals(config.decimals, 18),
                ),
            };
            let runner = ScenarioRunner::new(ScenarioConfig::default().with_budgets(
                TokenAmount::from_units(10_000_000, config.decimals)?,
                TokenAmount::from_units(500, 18)?,
            ));
            let report = runner
                .run(&env, schedule.as_mut())
                .await
                .context("running swap scenario")?;

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_scenario(&report, config.decimals);
            }
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(err) = run(cli).await {
        error!(error = %format!("{err:#}"), "clmm-launch failed");
        return Err(err);
    }
    Ok(())
}
