use anyhow::{Context, Result};
use capm::prelude::*;
use chrono::NaiveDate;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "capm")]
#[command(
    about = "Run statistical and CAPM analyses between a stock and a market index",
    long_about = None
)]
struct Cli {
    //stock ticker symbol (eg msft)
    #[arg(long)]
    stock: String,

    //market ticker symbol (eg spy)
    #[arg(long)]
    market: String,

    //start date in YYYY-MM-DD format (inclusive)
    #[arg(long)]
    start: String,

    //end date in YYYY-MM-DD format (exclusive)
    #[arg(long)]
    end: String,

    //output folder for csv and chart exports
    //defaults to a folder named after the run
    #[arg(long)]
    output_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let start = parse_date(&cli.start).context("Invalid --start date")?;
    let end = parse_date(&cli.end).context("Invalid --end date")?;

    let config = AnalysisConfiguration {
        stock: cli.stock.to_uppercase(),
        market: cli.market.to_uppercase(),
        start,
        end,
        output_dir: cli.output_dir,
    };

    run_analysis(config).await
}

fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").context(format!("Expected YYYY-MM-DD, got {:?}", s))
}

async fn run_analysis(config: AnalysisConfiguration) -> Result<()> {
    println!("CAPM Stock vs Market Analysis");
    println!("=============================\n");

    //fetch data
    println!(
        "Fetching {} and {} from {} to {}...",
        config.stock, config.market, config.start, config.end
    );
    let provider = YahooProvider::new()?;
    let stock_prices = provider
        .fetch_daily_closes(&config.stock, config.start, config.end)
        .await
        .context(format!("Failed to load price data for {}", config.stock))?;
    let market_prices = provider
        .fetch_daily_closes(&config.market, config.start, config.end)
        .await
        .context(format!("Failed to load price data for {}", config.market))?;

    print_loaded(&stock_prices);
    print_loaded(&market_prices);

    //build daily returns and align on date
    let stock_returns = daily_returns(&stock_prices);
    let market_returns = daily_returns(&market_prices);
    let aligned = align(&stock_returns, &market_returns);

    if aligned.is_empty() {
        anyhow::bail!(
            "No overlapping trading days with defined returns for {} and {}",
            config.stock,
            config.market
        );
    }
    println!("Aligned daily returns: {} observations\n", aligned.len());

    //descriptive statistics
    let stats = DescriptiveStats::from_aligned(&aligned);
    let stats_table = StatsTable::from_stats(&stats, &config.stock, &config.market);

    println!("Descriptive Statistics");
    println!("======================\n");
    stats_table.pretty_print_table();

    //CAPM regression
    //a failed fit still leaves the descriptive results usable
    println!("\nCAPM Regression");
    println!("===============\n");
    let capm_table = match fit_capm(&aligned) {
        Ok(result) => {
            let table = CapmTable::from_result(&result);
            table.pretty_print_table();
            Some(table)
        }
        Err(err) => {
            println!("CAPM regression unavailable: {}", err);
            None
        }
    };

    //exports
    let out_dir = ensure_output_dir(&config)?;

    let stats_path = out_dir.join("desc_stats.csv");
    write_stats_csv(&stats_table, &stats_path)?;
    println!("\nDescriptive statistics saved to {:?}", stats_path);

    if let Some(table) = &capm_table {
        let capm_path = out_dir.join("CAPM_regression.csv");
        write_capm_csv(table, &capm_path)?;
        println!("Regression results saved to {:?}", capm_path);
    }

    render_all(
        &out_dir,
        &config,
        &stock_prices,
        &market_prices,
        &aligned,
        &stats,
    )
    .context("Failed to render charts")?;
    println!("Charts saved to {:?}", out_dir);

    Ok(())
}

fn print_loaded(prices: &PriceSeries) {
    if let Some((first, last)) = prices.date_range() {
        println!(
            "Loaded {} daily closes for {} ({} to {})",
            prices.len(),
            prices.symbol,
            first,
            last
        );
    }
}
