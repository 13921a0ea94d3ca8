//! Categories command for listing the profile's categories.

use std::fmt::Write as _;
use std::io::Write;

use anyhow::Result;
use clap::Args;
use tb_core::{Category, order_other_last};

use crate::{Config, Snapshot};

#[derive(Debug, Args)]
pub struct CategoriesArgs {
    /// Output as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Format categories for human-readable output, "Other" last.
pub fn format_categories(categories: &[Category]) -> String {
    let mut ordered = categories.to_vec();
    order_other_last(&mut ordered);

    let mut output = String::new();
    for category in &ordered {
        writeln!(
            output,
            "{:<20}  {:<10}  {}",
            category.id.as_str(),
            category.name,
            category.color
        )
        .unwrap();
        for subcategory in &category.subcategories {
            writeln!(output, "  {:<26}  {}", subcategory.id.as_str(), subcategory.name).unwrap();
        }
    }
    output
}

/// Runs the categories command.
pub fn run<W: Write>(writer: &mut W, args: &CategoriesArgs, config: &Config) -> Result<()> {
    let snapshot = Snapshot::load(&config.snapshot_path)?;
    let categories = &snapshot.profile.categories;

    if args.json {
        let mut ordered = categories.clone();
        order_other_last(&mut ordered);
        writeln!(writer, "{}", serde_json::to_string_pretty(&ordered)?)?;
    } else {
        write!(writer, "{}", format_categories(categories))?;
    }
    Ok(())
}
