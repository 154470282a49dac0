use std::path::Path;
use std::sync::Arc;
use std::thread;

use anyhow::{bail, Context};
use colored::Colorize;
use ordl_ledger::{
    Block, Ledger, LedgerConfig, LedgerReader, LedgerWriter, SharedLedger, ValidationReport,
};
use ordl_types::{Amount, OrderRecord, OrderStatus};
use rand::Rng;
use serde::Serialize;
use tracing::info;

use crate::cli::*;
use crate::config::CliConfig;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = CliConfig::load_or_default(cli.config.as_deref())?;
    match cli.command {
        Command::Simulate(args) => {
            let summary = cmd_simulate(&args, &config)?;
            print_summary(&summary, cli.format)
        }
        Command::Verify(args) => cmd_verify(&args.path, &config, cli.format),
        Command::Show(args) => cmd_show(&args, &config, cli.format),
    }
}

#[derive(Debug, Serialize)]
struct SimulationSummary {
    orders: usize,
    workers: usize,
    blocks: usize,
    last_hash: String,
    valid: bool,
    export: Option<String>,
    tampered_index: Option<usize>,
}

fn cmd_simulate(args: &SimulateArgs, config: &CliConfig) -> anyhow::Result<SimulationSummary> {
    let orders = args.orders.unwrap_or(config.orders);
    let workers = args.workers.unwrap_or(config.workers).max(1);
    let ledger: SharedLedger = Arc::new(Ledger::with_config(config.ledger.clone())?);

    info!(orders, workers, "starting simulation");
    let handles: Vec<_> = (0..workers)
        .map(|worker| {
            let ledger = Arc::clone(&ledger);
            let share = orders / workers + usize::from(worker < orders % workers);
            let users = config.users.max(1);
            let max_items = config.max_items.max(1);
            thread::spawn(move || -> anyhow::Result<()> {
                let mut rng = rand::thread_rng();
                for _ in 0..share {
                    ledger.append(random_order(&mut rng, users, max_items))?;
                }
                Ok(())
            })
        })
        .collect();
    for handle in handles {
        match handle.join() {
            Ok(result) => result?,
            Err(_) => bail!("simulation worker panicked"),
        }
    }

    let valid = ledger.validate()?;
    let last = ledger.last()?;

    let export = match &args.export {
        Some(path) => {
            export_chain(ledger.as_ref(), path, args.tamper)?;
            Some(path.display().to_string())
        }
        None => None,
    };

    Ok(SimulationSummary {
        orders,
        workers,
        blocks: ledger.block_count()?,
        last_hash: last.hash().to_hex(),
        valid,
        export,
        tampered_index: args.tamper,
    })
}

fn random_order(rng: &mut impl Rng, users: usize, max_items: usize) -> OrderRecord {
    let lines: Vec<(String, u32)> = (0..rng.gen_range(1..=max_items))
        .map(|_| (format!("prod-{}", rng.gen_range(1..=50)), rng.gen_range(1..=3)))
        .collect();
    let product_ids =
        OrderRecord::expand_quantities(lines.iter().map(|(id, qty)| (id.as_str(), *qty)));
    let total = Amount::from_minor(product_ids.len() as u64 * rng.gen_range(100..=10_000));
    let status = OrderStatus::ALL[rng.gen_range(0..OrderStatus::ALL.len())];

    OrderRecord::new(
        OrderRecord::generate_id(),
        format!("user-{}", rng.gen_range(1..=users)),
        product_ids,
        total,
    )
    .with_status(status)
}

fn export_chain(ledger: &Ledger, path: &Path, tamper: Option<usize>) -> anyhow::Result<()> {
    let mut value = serde_json::to_value(ledger.read_all()?)?;
    if let Some(index) = tamper {
        let Some(block) = value.get_mut(index) else {
            bail!("cannot tamper with block {index}: chain is shorter");
        };
        block["data"]["user_id"] = serde_json::Value::from("tampered");
    }
    let json = serde_json::to_string_pretty(&value)?;
    std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
    info!(path = %path.display(), "chain exported");
    Ok(())
}

fn load_export(path: &Path) -> anyhow::Result<Vec<Block>> {
    let raw =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing chain export {}", path.display()))
}

/// Always inspects, so a corrupt export yields a report rather than an error.
fn audit_export(path: &Path, config: &CliConfig) -> anyhow::Result<ValidationReport> {
    let blocks = load_export(path)?;
    let inspection = LedgerConfig {
        audit_on_restore: false,
        ..config.ledger.clone()
    };
    let ledger = Ledger::restore(blocks, inspection)?;
    Ok(ledger.audit()?)
}

fn cmd_verify(path: &Path, config: &CliConfig, format: OutputFormat) -> anyhow::Result<()> {
    let report = audit_export(path, config)?;

    match format {
        OutputFormat::Json => {
            let violations: Vec<_> = report
                .violations
                .iter()
                .map(|v| {
                    serde_json::json!({
                        "index": v.index,
                        "kind": format!("{:?}", v.kind),
                        "description": v.description,
                    })
                })
                .collect();
            println!(
                "{}",
                serde_json::to_string_pretty(&serde_json::json!({
                    "valid": report.is_valid(),
                    "blocks": report.block_count,
                    "violations": violations,
                }))?
            );
        }
        OutputFormat::Text => {
            if report.is_valid() {
                println!("{} Chain integrity verified", "✓".green().bold());
            } else {
                println!("{} Chain integrity violated", "✗".red().bold());
            }
            println!("  Blocks: {}", report.block_count.to_string().bold());
            println!("  Genesis: {}", status_word(report.genesis_valid));
            println!("  Links: {}", status_word(report.links_valid));
            println!("  Hashes: {}", status_word(report.hashes_valid));
            for v in &report.violations {
                let at = v.index.map(|i| format!("#{i}")).unwrap_or_else(|| "-".into());
                println!("  {} {} {}", at.yellow(), format!("{:?}", v.kind).red(), v.description);
            }
        }
    }

    if !report.is_valid() {
        bail!("{} integrity violation(s) found", report.violations.len());
    }
    Ok(())
}

fn cmd_show(args: &ShowArgs, config: &CliConfig, format: OutputFormat) -> anyhow::Result<()> {
    let blocks = load_export(&args.path)?;
    let ledger = Ledger::restore(blocks, config.ledger.clone())
        .with_context(|| format!("loading {}", args.path.display()))?;

    let selected: Vec<(usize, Block)> = match &args.order_id {
        Some(order_id) => {
            let Some(located) = ledger.locate_order_id(order_id)? else {
                bail!("order {order_id} not found");
            };
            vec![located]
        }
        None => ledger
            .read_all()?
            .into_iter()
            .enumerate()
            .take(args.limit)
            .collect(),
    };

    match format {
        OutputFormat::Json => {
            let blocks: Vec<&Block> = selected.iter().map(|(_, b)| b).collect();
            println!("{}", serde_json::to_string_pretty(&blocks)?);
        }
        OutputFormat::Text => {
            for (index, block) in &selected {
                print_block(*index, block);
            }
        }
    }
    Ok(())
}

fn print_block(index: usize, block: &Block) {
    let data = block.data();
    println!(
        "{}  {}  {}",
        format!("#{index}").yellow().bold(),
        block.hash().short_hex().dimmed(),
        block.timestamp()
    );
    println!("  Order: {} ({})", data.order_id.bold(), data.status.to_string().cyan());
    if !block.is_genesis() {
        println!("  User: {}", data.user_id);
        println!("  Items: {}  Total: {}", data.product_ids.len(), data.total_amount);
    }
    println!("  Prev: {}", block.prev_hash().to_string().dimmed());
}

fn print_summary(summary: &SimulationSummary, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(summary)?),
        OutputFormat::Text => {
            println!(
                "{} Appended {} orders from {} workers",
                "✓".green().bold(),
                summary.orders.to_string().bold(),
                summary.workers
            );
            println!("  Blocks: {}", summary.blocks);
            println!("  Head: {}", summary.last_hash.yellow());
            println!("  Integrity: {}", status_word(summary.valid));
            if let Some(path) = &summary.export {
                println!("  Exported: {}", path.blue());
            }
            if let Some(index) = summary.tampered_index {
                println!("  {} block #{index} corrupted in export", "!".red().bold());
            }
        }
    }
    Ok(())
}

fn status_word(ok: bool) -> colored::ColoredString {
    if ok {
        "valid".green()
    } else {
        "INVALID".red().bold()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> CliConfig {
        CliConfig {
            workers: 3,
            orders: 30,
            ..Default::default()
        }
    }

    #[test]
    fn simulate_appends_every_order() {
        let summary = cmd_simulate(&SimulateArgs::default(), &config()).unwrap();
        assert_eq!(summary.blocks, 31);
        assert!(summary.valid);
        assert_eq!(summary.last_hash.len(), 64);
    }

    #[test]
    fn flags_override_config() {
        let args = SimulateArgs {
            orders: Some(7),
            workers: Some(2),
            ..Default::default()
        };
        let summary = cmd_simulate(&args, &config()).unwrap();
        assert_eq!(summary.orders, 7);
        assert_eq!(summary.workers, 2);
        assert_eq!(summary.blocks, 8);
    }

    #[test]
    fn exported_chain_verifies() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chain.json");
        let args = SimulateArgs {
            export: Some(path.clone()),
            ..Default::default()
        };
        cmd_simulate(&args, &config()).unwrap();

        let report = audit_export(&path, &config()).unwrap();
        assert!(report.is_valid());
        assert_eq!(report.block_count, 31);
        cmd_verify(&path, &config(), OutputFormat::Json).unwrap();
    }

    #[test]
    fn tampered_export_fails_verification() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chain.json");
        let args = SimulateArgs {
            export: Some(path.clone()),
            tamper: Some(5),
            ..Default::default()
        };
        let summary = cmd_simulate(&args, &config()).unwrap();
        assert!(summary.valid);

        let report = audit_export(&path, &config()).unwrap();
        assert!(!report.is_valid());
        assert_eq!(report.violations[0].index, Some(5));
        assert!(cmd_verify(&path, &config(), OutputFormat::Text).is_err());
    }

    #[test]
    fn tamper_index_past_end_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let args = SimulateArgs {
            orders: Some(2),
            export: Some(dir.path().join("chain.json")),
            tamper: Some(10),
            ..Default::default()
        };
        assert!(cmd_simulate(&args, &config()).is_err());
    }

    #[test]
    fn show_looks_up_orders() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chain.json");
        let args = SimulateArgs {
            export: Some(path.clone()),
            ..Default::default()
        };
        cmd_simulate(&args, &config()).unwrap();

        let show = |order_id: Option<&str>| ShowArgs {
            path: path.clone(),
            order_id: order_id.map(str::to_string),
            limit: 5,
        };
        cmd_show(&show(Some("genesis")), &config(), OutputFormat::Text).unwrap();
        cmd_show(&show(None), &config(), OutputFormat::Json).unwrap();
        assert!(cmd_show(&show(Some("no-such-order")), &config(), OutputFormat::Text).is_err());
    }

    #[test]
    fn show_honours_restore_audit_setting() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chain.json");
        let args = SimulateArgs {
            export: Some(path.clone()),
            tamper: Some(3),
            ..Default::default()
        };
        cmd_simulate(&args, &config()).unwrap();

        let show = ShowArgs {
            path: path.clone(),
            order_id: None,
            limit: 5,
        };
        assert!(cmd_show(&show, &config(), OutputFormat::Text).is_err());

        let mut inspecting = config();
        inspecting.ledger.audit_on_restore = false;
        cmd_show(&show, &inspecting, OutputFormat::Text).unwrap();
        assert!(!audit_export(&path, &config()).unwrap().is_valid());
    }

    #[test]
    fn random_orders_are_well_formed() {
        let mut rng = rand::thread_rng();
        for _ in 0..50 {
            let order = random_order(&mut rng, 3, 4);
            assert!(!order.product_ids.is_empty());
            assert!(order.product_ids.len() <= 12);
            assert!(order.user_id.starts_with("user-"));
        }
    }
}
