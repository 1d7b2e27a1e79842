// CLI surface - presentation glue over the classification core

use anyhow::{bail, Result};
use std::env;
use std::path::Path;

use finsight::{
    credit_total, debit_totals, resolve_store_path, CategoryEdit, CategoryStore, DocStore,
    Session,
};

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    match args.get(1).map(String::as_str) {
        Some("report") => run_report(&args[2..]),
        Some("categories") => run_categories(),
        Some("add-category") => run_add_category(&args[2..]),
        Some("add-keyword") => run_add_keyword(&args[2..]),
        _ => {
            print_usage();
            Ok(())
        }
    }
}

fn print_usage() {
    println!("finsight {}", finsight::VERSION);
    println!();
    println!("Usage:");
    println!("  finsight report <export.csv> [--assign ROW=CATEGORY]...");
    println!("      ROW is the zero-based index printed in the transactions table");
    println!("  finsight categories");
    println!("  finsight add-category <name>");
    println!("  finsight add-keyword <category> <keyword>");
}

/// Open the category store, degrading to in-memory defaults when the
/// connection string is unresolved.
fn open_store() -> CategoryStore {
    match resolve_store_path() {
        Ok(path) => CategoryStore::load(DocStore::new(path)),
        Err(e) => {
            eprintln!("⚠ {e}; categories will not be saved this session");
            CategoryStore::in_memory()
        }
    }
}

fn run_report(args: &[String]) -> Result<()> {
    let Some(csv_path) = args.first() else {
        bail!("report needs a CSV path");
    };

    let mut store = open_store();
    let mut session = Session::new();

    let records = match finsight::load_transactions_file(Path::new(csv_path)) {
        Ok(records) => records,
        Err(e) => {
            // Nothing loaded: report and leave any prior state untouched
            eprintln!("✗ could not load {}: {}", csv_path, e);
            return Ok(());
        }
    };

    session.load(records, &store);
    println!("✓ Loaded {} transactions", session.transactions().len());

    let edits = parse_assignments(&args[1..])?;
    if !edits.is_empty() {
        let changed = session.apply_edits(&edits, &mut store);
        println!("✓ Reassigned {} rows", changed);
    }

    println!("\nTransactions");
    println!("─────────────────────────────────────────────────────────────────");
    for (row, tx) in session.transactions().iter().enumerate() {
        println!(
            "{:>4}  {}  {:<25} ${:>10.2}  {:<6} {}",
            row,
            tx.date,
            tx.details,
            tx.amount,
            tx.direction.as_str(),
            tx.category
        );
    }

    println!("\nExpenses by Category");
    println!("─────────────────────────────────────");
    for total in debit_totals(session.transactions()) {
        println!("{:<25} ${:>10.2}", total.category, total.total);
    }

    println!("\nTotal Credits: ${:.2}", credit_total(session.transactions()));

    Ok(())
}

fn run_categories() -> Result<()> {
    let store = open_store();

    for entry in store.book().iter() {
        if entry.keywords.is_empty() {
            println!("{}", entry.name);
        } else {
            println!("{}: {}", entry.name, entry.keywords.join(", "));
        }
    }

    Ok(())
}

fn run_add_category(args: &[String]) -> Result<()> {
    let Some(name) = args.first() else {
        bail!("add-category needs a name");
    };

    let mut store = open_store();
    if store.create_category(name) {
        println!("✓ Created category '{}'", name);
    } else {
        println!("⚠ Category '{}' already exists", name);
    }

    Ok(())
}

fn run_add_keyword(args: &[String]) -> Result<()> {
    let (Some(category), Some(keyword)) = (args.first(), args.get(1)) else {
        bail!("add-keyword needs a category and a keyword");
    };

    let mut store = open_store();
    if store.add_keyword(category, keyword) {
        println!("✓ Added keyword '{}' to '{}'", keyword.trim(), category);
    } else {
        println!("⚠ Keyword not added (empty, reserved category, or already present)");
    }

    Ok(())
}

/// Parse repeated `--assign ROW=CATEGORY` flags into edits.
fn parse_assignments(args: &[String]) -> Result<Vec<CategoryEdit>> {
    let mut edits = Vec::new();
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        if arg != "--assign" {
            bail!("unexpected argument: {}", arg);
        }
        let Some(value) = iter.next() else {
            bail!("--assign needs ROW=CATEGORY");
        };
        let Some((row, category)) = value.split_once('=') else {
            bail!("--assign value {:?} is not ROW=CATEGORY", value);
        };
        let row: usize = row
            .parse()
            .map_err(|_| anyhow::anyhow!("--assign row {:?} is not a number", row))?;

        edits.push(CategoryEdit {
            row,
            category: category.to_string(),
        });
    }

    Ok(edits)
}
