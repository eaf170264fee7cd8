//! xmrkit CLI
//!
//! Command-line interface for Monero addresses, keys and output scanning.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use xmrkit_core::amount::{float_to_xmr, xmr_to_decimal, xmr_to_float};
use xmrkit_core::constants::PAYMENT_ID_SIZE;
use xmrkit_core::traits::{ProgressCallback, TransactionSource};
use xmrkit_core::types::{LedgerTransaction, NetworkType};
use xmrkit_crypto::{PrivateKey, PublicKey};
use xmrkit_scanner::{MemorySource, OwnedOutput, Scanner, ScannerConfig};
use xmrkit_stealth::{
    generate_subaddress, new_address, new_payment_id256, new_payment_id64, FullKeyPair,
    MoneroAddress, StealthPaymentBuilder, ViewOnlyKeyPair,
};

/// xmrkit - Monero address and output toolkit
#[derive(Parser)]
#[command(name = "xmrkit")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Network for generated addresses
    #[arg(long, global = true, env = "XMRKIT_NETWORK", default_value = "mainnet")]
    network: NetworkType,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode and validate an address
    Decode {
        /// Address to decode
        address: String,
    },

    /// Derive subaddresses from a private view key and public spend key
    Subaddress {
        /// Private view key (hex)
        #[arg(long, env = "XMRKIT_VIEW_KEY")]
        view_key: String,
        /// Public spend key (hex)
        #[arg(long, env = "XMRKIT_SPEND_KEY")]
        spend_key: String,
        /// Account index
        #[arg(long, default_value = "0")]
        major: u32,
        /// First address index
        #[arg(long, default_value = "1")]
        minor: u32,
        /// Number of consecutive address indices to derive
        #[arg(short, long, default_value = "1")]
        count: u32,
    },

    /// Generate an account, or restore one from its private spend key
    Keys {
        /// Private spend key (hex); omitted to generate a new account
        #[arg(long)]
        spend_key: Option<String>,
    },

    /// Build an integrated address from a primary address
    Integrated {
        /// Primary address
        address: String,
        /// Payment id (16 hex chars); random if omitted
        #[arg(long)]
        payment_id: Option<String>,
    },

    /// Scan a JSON transaction dump for owned outputs
    Scan {
        /// Private view key (hex)
        #[arg(long, env = "XMRKIT_VIEW_KEY")]
        view_key: String,
        /// Public spend key (hex); defaults to the first address's spend key
        #[arg(long, env = "XMRKIT_SPEND_KEY")]
        spend_key: Option<String>,
        /// Addresses to match; defaults to the primary address and a subaddress lookahead
        #[arg(long, num_args = 1..)]
        addresses: Vec<String>,
        /// JSON file holding an array of transactions
        #[arg(long)]
        txs: PathBuf,
        /// Accounts covered by the lookahead
        #[arg(long, default_value = "1")]
        accounts: u32,
        /// Subaddresses per account covered by the lookahead
        #[arg(long, default_value = "50")]
        per_account: u32,
        /// First block height
        #[arg(long, default_value = "0")]
        from: u64,
        /// End block height (exclusive); defaults to the chain height
        #[arg(long)]
        to: Option<u64>,
        /// Ignore owned outputs below this amount (XMR)
        #[arg(long)]
        min_amount: Option<f64>,
        /// Skip the view tag filter
        #[arg(long)]
        no_view_tags: bool,
        /// Scan on all cores
        #[arg(long)]
        parallel: bool,
        /// Abort on the first malformed output
        #[arg(long)]
        fail_fast: bool,
    },

    /// Convert between atomic units and XMR
    Amount {
        /// Amount in atomic units
        #[arg(conflicts_with = "xmr", required_unless_present = "xmr")]
        atomic: Option<u64>,
        /// Amount in XMR
        #[arg(long)]
        xmr: Option<f64>,
    },

    /// Build a transaction paying an address and append it to a JSON dump
    Pay {
        /// Recipient address
        address: String,
        /// Amount in XMR
        #[arg(long)]
        amount: f64,
        /// Block height recorded for the transaction
        #[arg(long, default_value = "0")]
        height: u64,
        /// JSON file to append to (created if missing); printed if omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        "xmrkit=debug,info"
    } else {
        "xmrkit=info,warn"
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let network = cli.network;
    let json = cli.json;

    match cli.command {
        Commands::Decode { address } => cmd_decode(&address, json),
        Commands::Subaddress {
            view_key,
            spend_key,
            major,
            minor,
            count,
        } => cmd_subaddress(&view_key, &spend_key, major, minor, count, network, json),
        Commands::Keys { spend_key } => cmd_keys(spend_key.as_deref(), network, json),
        Commands::Integrated {
            address,
            payment_id,
        } => cmd_integrated(&address, payment_id.as_deref(), json),
        Commands::Scan {
            view_key,
            spend_key,
            addresses,
            txs,
            accounts,
            per_account,
            from,
            to,
            min_amount,
            no_view_tags,
            parallel,
            fail_fast,
        } => {
            let mut config = ScannerConfig::new();
            if no_view_tags {
                config = config.without_view_tags();
            }
            if parallel {
                config = config.parallel();
            }
            if fail_fast {
                config = config.fail_fast();
            }
            if let Some(min) = min_amount {
                config = config.min_amount(float_to_xmr(min));
            }
            let args = ScanArgs {
                view_key,
                spend_key,
                addresses,
                txs,
                accounts,
                per_account,
                from,
                to,
            };
            cmd_scan(args, config, network, json).await
        }
        Commands::Amount { atomic, xmr } => cmd_amount(atomic, xmr, json),
        Commands::Pay {
            address,
            amount,
            height,
            output,
        } => cmd_pay(&address, amount, height, output.as_deref(), json),
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// ADDRESSES
// ═══════════════════════════════════════════════════════════════════════════════

fn address_json(address: &MoneroAddress) -> serde_json::Value {
    serde_json::json!({
        "address": address.address(),
        "network": address.network_type(),
        "type": address.address_type(),
        "public_spend_key": address.public_spend_key().to_hex(),
        "public_view_key": address.public_view_key().to_hex(),
        "payment_id": address.payment_id().map(hex::encode),
    })
}

/// Decode an address
fn cmd_decode(address: &str, json: bool) -> Result<()> {
    let address = new_address(address).context("Invalid address")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&address_json(&address))?);
        return Ok(());
    }

    println!("{}", "✅ Valid address".green().bold());
    println!("   {} {}", "Network:".dimmed(), address.network_type());
    println!("   {} {}", "Type:".dimmed(), address.address_type());
    println!("   {} {}", "Spend key:".dimmed(), address.public_spend_key());
    println!("   {} {}", "View key:".dimmed(), address.public_view_key());
    if let Some(id) = address.payment_id() {
        println!("   {} {}", "Payment id:".dimmed(), hex::encode(id));
    }

    Ok(())
}

/// Derive subaddresses
fn cmd_subaddress(
    view_key: &str,
    spend_key: &str,
    major: u32,
    minor: u32,
    count: u32,
    network: NetworkType,
    json: bool,
) -> Result<()> {
    let view = PrivateKey::from_hex(view_key).context("Invalid private view key")?;
    let spend = PublicKey::from_hex(spend_key).context("Invalid public spend key")?;

    let mut derived = Vec::with_capacity(count as usize);
    for offset in 0..count {
        let minor = minor
            .checked_add(offset)
            .context("Address index overflows u32")?;
        derived.push((minor, generate_subaddress(&view, &spend, major, minor, network)));
    }

    if json {
        let list: Vec<serde_json::Value> = derived
            .iter()
            .map(|(minor, address)| {
                let mut entry = address_json(address);
                entry["major"] = major.into();
                entry["minor"] = (*minor).into();
                entry
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&list)?);
        return Ok(());
    }

    if major == 0 && minor == 0 {
        println!(
            "{}",
            "⚠️  Index (0, 0) is the primary address; shown here as a subaddress.".yellow()
        );
    }
    for (minor, address) in &derived {
        println!("{} {}", format!("({}, {})", major, minor).cyan(), address);
    }

    Ok(())
}

/// Build an integrated address
fn cmd_integrated(address: &str, payment_id: Option<&str>, json: bool) -> Result<()> {
    let address = new_address(address).context("Invalid address")?;

    let id: [u8; PAYMENT_ID_SIZE] = match payment_id {
        Some(hex_id) => hex::decode(hex_id)
            .context("Payment id is not hex")?
            .try_into()
            .map_err(|_| anyhow::anyhow!("Payment id must be {} bytes", PAYMENT_ID_SIZE))?,
        None => new_payment_id64(),
    };

    let integrated = address.integrated(id).context("Cannot integrate address")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&address_json(&integrated))?);
    } else {
        println!("{} {}", "Payment id:".dimmed(), hex::encode(id));
        println!("{}", integrated.to_string().green());
    }

    Ok(())
}

// ═══════════════════════════════════════════════════════════════════════════════
// KEYS
// ═══════════════════════════════════════════════════════════════════════════════

/// Generate or restore account keys
fn cmd_keys(spend_key: Option<&str>, network: NetworkType, json: bool) -> Result<()> {
    let keys = match spend_key {
        Some(hex_key) => {
            let spend = PrivateKey::from_hex(hex_key).context("Invalid private spend key")?;
            FullKeyPair::from_private_spend_key(spend)
        }
        None => FullKeyPair::generate(),
    };
    let primary = keys.primary_address(network);

    let keys_json = serde_json::json!({
        "network": network,
        "private_spend_key": keys.spend_key_pair().private_key().to_hex(),
        "private_view_key": keys.view_key_pair().private_key().to_hex(),
        "public_spend_key": keys.spend_key_pair().public_key().to_hex(),
        "public_view_key": keys.view_key_pair().public_key().to_hex(),
        "address": primary.address(),
    });

    if json {
        println!("{}", serde_json::to_string_pretty(&keys_json)?);
    } else {
        println!("{}", "🔑 Account keys".cyan().bold());
        println!("{}", serde_json::to_string_pretty(&keys_json)?);
    }

    // Warnings go to stderr so JSON output stays clean
    eprintln!("\n{}", "⚠️  IMPORTANT: Keep your private keys safe!".red().bold());
    eprintln!("   The private spend key must never be shared.");

    Ok(())
}

// ═══════════════════════════════════════════════════════════════════════════════
// SCANNING
// ═══════════════════════════════════════════════════════════════════════════════

struct ScanArgs {
    view_key: String,
    spend_key: Option<String>,
    addresses: Vec<String>,
    txs: PathBuf,
    accounts: u32,
    per_account: u32,
    from: u64,
    to: Option<u64>,
}

/// Scan a transaction dump
async fn cmd_scan(
    args: ScanArgs,
    config: ScannerConfig,
    network: NetworkType,
    json: bool,
) -> Result<()> {
    let view = PrivateKey::from_hex(&args.view_key).context("Invalid private view key")?;
    let addresses = args
        .addresses
        .iter()
        .map(|a| new_address(a).with_context(|| format!("Invalid address {}", a)))
        .collect::<Result<Vec<_>>>()?;

    let spend = match (&args.spend_key, addresses.first()) {
        (Some(hex_key), _) => PublicKey::from_hex(hex_key).context("Invalid public spend key")?,
        (None, Some(first)) => *first.public_spend_key(),
        (None, None) => bail!("Either --spend-key or --addresses is required"),
    };
    let keys = ViewOnlyKeyPair::new(view, spend);

    let scanner = if addresses.is_empty() {
        Scanner::with_lookahead(keys, network, args.accounts, args.per_account, config)
    } else {
        Scanner::with_config(keys, addresses, config)
    };
    debug!(candidates = scanner.candidates().len(), "Scanner ready");

    let source = MemorySource::from_json_file(&args.txs).context("Failed to load transactions")?;
    let end = match args.to {
        Some(to) => to,
        None => source.chain_height().await?,
    };
    if end <= args.from {
        bail!("Empty height range {}..{}", args.from, end);
    }

    if !json {
        println!(
            "{} {} transactions, {} candidate addresses",
            "🔎 Scanning".cyan().bold(),
            source.len(),
            scanner.candidates().len()
        );
    }

    let pb = if json {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(end - args.from)
    };
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} blocks ({eta})")?
            .progress_chars("#>-"),
    );
    let bar = pb.clone();
    let callback: ProgressCallback = Box::new(move |progress| bar.set_position(progress.scanned));

    let scans = scanner
        .scan_source_with_progress(&source, args.from..end, callback)
        .await
        .context("Scan failed")?;
    pb.finish_and_clear();

    let owned: Vec<&OwnedOutput> = scans.iter().flat_map(|scan| scan.owned()).collect();
    let total: u64 = owned.iter().map(|o| o.amount).sum();
    let stats = scanner.stats();

    if json {
        let report = serde_json::json!({
            "owned": owned,
            "total_received": total,
            "stats": stats,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    if owned.is_empty() {
        println!("\n{}", "No owned outputs found.".yellow());
    } else {
        println!("\n{} {} output(s) found:", "✅".green(), owned.len());
        for output in &owned {
            println!(
                "   {} {} XMR",
                format!("{}:{}", output.tx_hash, output.index).dimmed(),
                xmr_to_decimal(output.amount).green()
            );
            println!("      {} {}", "to".dimmed(), output.address);
        }
        println!("\n   {} {} XMR", "Total:".bold(), xmr_to_decimal(total).green().bold());
    }

    for scan in scans.iter().filter(|s| s.error.is_some() || s.failure_count() > 0) {
        match &scan.error {
            Some(e) => println!("   {} {}: {}", "⚠️".yellow(), scan.hash, e),
            None => println!(
                "   {} {}: {} malformed output(s)",
                "⚠️".yellow(),
                scan.hash,
                scan.failure_count()
            ),
        }
    }

    println!("\n{}", "📈 Stats:".green().bold());
    println!("   Outputs scanned: {}", stats.outputs_scanned);
    println!("   View tag rejects: {:.1}%", stats.filter_efficiency());
    println!("   Ownership checks: {}", stats.ownership_checks);
    if stats.below_minimum > 0 {
        println!("   Below minimum: {}", stats.below_minimum);
    }

    Ok(())
}

// ═══════════════════════════════════════════════════════════════════════════════
// AMOUNTS AND PAYMENTS
// ═══════════════════════════════════════════════════════════════════════════════

/// Convert amounts
fn cmd_amount(atomic: Option<u64>, xmr: Option<f64>, json: bool) -> Result<()> {
    let atomic = match (atomic, xmr) {
        (Some(atomic), _) => atomic,
        (None, Some(xmr)) => float_to_xmr(xmr),
        (None, None) => bail!("Either an atomic amount or --xmr is required"),
    };

    if json {
        let report = serde_json::json!({
            "atomic": atomic,
            "decimal": xmr_to_decimal(atomic),
            "float": xmr_to_float(atomic),
        });
        println!("{}", serde_json::to_string(&report)?);
    } else {
        println!("{} atomic units = {} XMR", atomic, xmr_to_decimal(atomic).green());
    }

    Ok(())
}

/// Build a payment transaction
fn cmd_pay(address: &str, amount: f64, height: u64, output: Option<&Path>, json: bool) -> Result<()> {
    let address = new_address(address).context("Invalid address")?;
    let atomic = float_to_xmr(amount);

    let payment = StealthPaymentBuilder::new()
        .recipient(address, atomic)
        .build()
        .context("Failed to build payment")?;
    // Placeholder hash; the dump is never broadcast
    let hash = hex::encode(new_payment_id256());
    let tx = payment.to_transaction(hash).at_height(height);

    let Some(path) = output else {
        println!("{}", LedgerTransaction::list_to_json(std::slice::from_ref(&tx))?);
        return Ok(());
    };

    let mut txs = if path.exists() {
        let existing = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        LedgerTransaction::list_from_json(&existing)?
    } else {
        Vec::new()
    };
    let hash = tx.hash.clone();
    txs.push(tx);
    std::fs::write(path, LedgerTransaction::list_to_json(&txs)?)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    if json {
        let report = serde_json::json!({ "hash": hash, "amount": atomic, "height": height });
        println!("{}", serde_json::to_string(&report)?);
    } else {
        println!(
            "{} {} XMR at height {} → {}",
            "✅ Payment of".green(),
            xmr_to_decimal(atomic),
            height,
            path.display()
        );
    }

    Ok(())
}
