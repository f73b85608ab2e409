//! Futures trading CLI - entry point.

use anyhow::Result;
use clap::{Parser, Subcommand};
use gate_api::{HttpFuturesApi, MarginMode};
use gate_core::{PositionSide, Price, Qty};
use gate_trader::{FuturesTrader, SystemClock};
use std::sync::Arc;
use tracing::info;

/// Futures trading CLI over the exchange's USDT-settled perpetuals.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Configuration file path (can also be set via GATE_BOT_CONFIG)
    #[arg(short, long)]
    config: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the account balance
    Balance,
    /// List open positions
    Positions,
    /// Show the last traded price for a symbol
    Price { symbol: String },
    /// Open a position with a market order
    Open {
        symbol: String,
        /// long or short
        side: PositionSide,
        /// Quantity in coin units
        qty: Qty,
        /// Leverage; the configured default when omitted
        #[arg(short, long)]
        leverage: Option<i32>,
    },
    /// Close a position with a reduce-only market order
    Close {
        symbol: String,
        /// Side of the position being closed
        side: PositionSide,
        /// Quantity in coin units; omit to close the whole position
        qty: Option<Qty>,
    },
    /// Place a stop-loss at the given trigger price
    StopLoss {
        symbol: String,
        /// Side of the position being protected
        side: PositionSide,
        /// Quantity in coin units
        qty: Qty,
        /// Trigger price
        price: Price,
    },
    /// Place a take-profit at the given trigger price
    TakeProfit {
        symbol: String,
        /// Side of the position being protected
        side: PositionSide,
        /// Quantity in coin units
        qty: Qty,
        /// Trigger price
        price: Price,
    },
    /// Set position leverage
    SetLeverage { symbol: String, leverage: i32 },
    /// Set the margin mode (cross or isolated)
    SetMarginMode {
        symbol: String,
        #[arg(value_parser = parse_margin_mode)]
        mode: MarginMode,
    },
    /// Cancel all standing and conditional orders for a symbol
    CancelAll { symbol: String },
    /// Cancel only stop-loss conditional orders
    CancelStopLoss { symbol: String },
    /// Cancel only take-profit conditional orders
    CancelTakeProfit { symbol: String },
    /// Cancel every protective conditional order
    CancelStops { symbol: String },
}

fn parse_margin_mode(s: &str) -> Result<MarginMode, String> {
    match s.to_ascii_lowercase().as_str() {
        "cross" => Ok(MarginMode::Cross),
        "isolated" => Ok(MarginMode::Isolated),
        other => Err(format!("unknown margin mode: {other}")),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    gate_bot::init_logging();

    let config_path = args
        .config
        .or_else(|| std::env::var("GATE_BOT_CONFIG").ok())
        .unwrap_or_else(|| "config/default.toml".to_string());
    let config = gate_bot::AppConfig::load_or_default(&config_path)?;

    let credentials = config.credentials()?;
    let api = HttpFuturesApi::with_base_url(&config.base_url, credentials)?;
    let trader = FuturesTrader::new(Arc::new(api), Arc::new(SystemClock));

    match args.command {
        Command::Balance => {
            let balance = trader.balance().await?;
            println!(
                "total {} / available {} / unrealised pnl {}",
                balance.total, balance.available, balance.unrealised_pnl
            );
        }
        Command::Positions => {
            let positions = trader.positions().await?;
            if positions.is_empty() {
                println!("no open positions");
            }
            for p in positions {
                println!(
                    "{} {} {} @ {} (mark {}, pnl {}, liq {})",
                    p.symbol, p.side, p.coin_qty, p.entry_price, p.mark_price,
                    p.unrealised_pnl, p.liq_price
                );
            }
        }
        Command::Price { symbol } => {
            let price = trader.market_price(&symbol).await?;
            println!("{price}");
        }
        Command::Open {
            symbol,
            side,
            qty,
            leverage,
        } => {
            let leverage = leverage.unwrap_or(config.default_leverage);
            let result = trader.open_position(&symbol, side, qty, leverage).await?;
            info!(order_id = result.order_id, status = %result.status, "order placed");
            println!("opened {}: order {}", result.contract, result.order_id);
        }
        Command::Close { symbol, side, qty } => {
            let result = trader.close_position(&symbol, side, qty).await?;
            println!("closed {}: order {}", result.contract, result.order_id);
        }
        Command::StopLoss {
            symbol,
            side,
            qty,
            price,
        } => {
            let id = trader.set_stop_loss(&symbol, side, qty, price).await?;
            println!("stop loss placed: {id}");
        }
        Command::TakeProfit {
            symbol,
            side,
            qty,
            price,
        } => {
            let id = trader.set_take_profit(&symbol, side, qty, price).await?;
            println!("take profit placed: {id}");
        }
        Command::SetLeverage { symbol, leverage } => {
            trader.set_leverage(&symbol, leverage).await?;
            println!("leverage set to {leverage}");
        }
        Command::SetMarginMode { symbol, mode } => {
            trader.set_margin_mode(&symbol, mode).await?;
            println!("margin mode set to {mode}");
        }
        Command::CancelAll { symbol } => {
            trader.cancel_all_orders(&symbol).await?;
            println!("all orders cancelled");
        }
        Command::CancelStopLoss { symbol } => {
            let n = trader.cancel_stop_loss_orders(&symbol).await?;
            println!("{n} stop-loss orders cancelled");
        }
        Command::CancelTakeProfit { symbol } => {
            let n = trader.cancel_take_profit_orders(&symbol).await?;
            println!("{n} take-profit orders cancelled");
        }
        Command::CancelStops { symbol } => {
            let n = trader.cancel_stop_orders(&symbol).await?;
            println!("{n} protective orders cancelled");
        }
    }

    Ok(())
}
