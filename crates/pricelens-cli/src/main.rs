//! Command-line front-end for pricelens
//!
//! # Usage
//!
//! ```bash
//! export GOOGLE_API_KEY="..."
//!
//! # One lookup, with the 52-week range
//! pricelens Infosys --symbol INFY.NS
//!
//! # Interactive session: one `name[,symbol]` per line
//! pricelens
//! ```

mod render;

use clap::Parser;
use pricelens_core::{
    DuckDuckGoSearch, PipelineConfig, Query, QueryPipeline, ValidationError, YahooFinanceClient,
};
use pricelens_llm::providers::OpenAIProvider;
use pricelens_utils::{LogFormat, init_tracing_with};
use std::io::{self, BufRead, Write};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{debug, info};

const INVALID_NAME: &str = "Please enter a valid stock name.";

#[derive(Parser, Debug)]
#[command(name = "pricelens")]
#[command(about = "Look up the latest price of an Indian stock", long_about = None)]
struct Args {
    /// Stock name, e.g. "Infosys". Omit to start an interactive session
    stock_name: Option<String>,

    /// Ticker for the 52-week range, e.g. INFY.NS
    #[arg(short, long)]
    symbol: Option<String>,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,

    /// Log output format (pretty or json)
    #[arg(long, default_value_t = LogFormat::Pretty)]
    log_format: LogFormat,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    // A missing .env file is fine
    let _ = dotenvy::dotenv();

    let args = Args::parse();
    init_tracing_with("warn,pricelens_core=info", args.log_format);

    if let Some(name) = &args.stock_name {
        let mut query = Query::new(name.as_str());
        if let Some(symbol) = &args.symbol {
            query = query.with_symbol(symbol);
        }
        if query.validate().is_err() {
            eprintln!("⚠️  {INVALID_NAME}");
            return Ok(ExitCode::FAILURE);
        }

        let pipeline = build_pipeline()?;
        return run_once(&pipeline, &query, args.json).await;
    }

    let pipeline = build_pipeline()?;
    interactive(&pipeline, args.json).await?;
    Ok(ExitCode::SUCCESS)
}

fn build_pipeline() -> anyhow::Result<QueryPipeline> {
    let config = PipelineConfig::from_env()?;
    let llm = OpenAIProvider::from_env()?;
    info!(model = %config.model, api_base = %llm.config().api_base, "Pipeline configured");

    Ok(QueryPipeline::new(
        Arc::new(DuckDuckGoSearch::new()?),
        Arc::new(llm),
        Arc::new(YahooFinanceClient::new()),
        config,
    ))
}

async fn run_once(pipeline: &QueryPipeline, query: &Query, json: bool) -> anyhow::Result<ExitCode> {
    let result = match pipeline.run(query).await {
        Ok(result) => result,
        Err(ValidationError::EmptyStockName) => {
            eprintln!("⚠️  {INVALID_NAME}");
            return Ok(ExitCode::FAILURE);
        }
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&render::render_json(query, &result))?);
    } else {
        print!("{}", render::render_text(query, &result));
    }

    Ok(if result.text_answer.is_ok() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn print_banner() {
    println!(
        r"
╔══════════════════════════════════════════════════════════╗
║                 Indian Stock Price Checker               ║
║                                                          ║
║  Enter a stock name, optionally followed by a ticker:    ║
║    Infosys                                               ║
║    Infosys, INFY.NS                                      ║
║                                                          ║
║  /exit to quit                                           ║
╚══════════════════════════════════════════════════════════╝
"
    );
}

/// Split `name[,symbol]`
fn parse_line(line: &str) -> Query {
    match line.split_once(',') {
        Some((name, symbol)) => Query::new(name).with_symbol(symbol),
        None => Query::new(line),
    }
}

async fn interactive(pipeline: &QueryPipeline, json: bool) -> anyhow::Result<()> {
    print_banner();

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("stock> ");
        stdout.flush()?;

        let mut input = String::new();
        match stdin.lock().read_line(&mut input) {
            Ok(0) => {
                // EOF
                println!("\nGoodbye!");
                break;
            }
            Ok(_) => {}
            Err(e) => {
                eprintln!("Error reading input: {e}");
                continue;
            }
        }

        let input = input.trim();
        if input.is_empty() {
            continue;
        }
        if input == "/exit" {
            println!("Goodbye!");
            break;
        }

        let query = parse_line(input);
        debug!(stock_name = query.stock_name(), symbol = ?query.symbol(), "Read query");
        run_once(pipeline, &query, json).await?;
        println!();
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_line() {
        let query = parse_line("Infosys, infy.ns");
        assert_eq!(query.stock_name(), "Infosys");
        assert_eq!(query.symbol(), Some("INFY.NS"));

        let query = parse_line("Tata Motors");
        assert_eq!(query.stock_name(), "Tata Motors");
        assert_eq!(query.symbol(), None);

        let query = parse_line(" ,TCS.NS");
        assert!(query.validate().is_err());
    }

    #[test]
    fn test_args() {
        let args = Args::parse_from(["pricelens", "Infosys", "--symbol", "INFY.NS", "--json"]);
        assert_eq!(args.stock_name.as_deref(), Some("Infosys"));
        assert_eq!(args.symbol.as_deref(), Some("INFY.NS"));
        assert!(args.json);
        assert_eq!(args.log_format, LogFormat::Pretty);

        let args = Args::parse_from(["pricelens", "--log-format", "json"]);
        assert!(args.stock_name.is_none());
        assert_eq!(args.log_format, LogFormat::Json);
    }
}
