use std::{fs::File, io::BufReader, path::PathBuf};

use anyhow::Context;
use polltab_stats::themes::{ThemeCatalog, score_themes};

use crate::{data, util};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct ThemesArg {
    /// CSV file with survey responses
    #[arg(long)]
    input: PathBuf,
    /// JSON file defining the theme catalog
    #[arg(long)]
    catalog: PathBuf,
    /// Response label prefix counted as a match
    #[arg(long, default_value = "A")]
    prefix: String,
    /// Keep only rows where a demographic column matches ('column=value')
    #[arg(long, value_parser = util::parse_filter)]
    filter: Option<(String, String)>,
    /// Emit JSON instead of text
    #[arg(long)]
    json: bool,
}

pub(crate) fn run(arg: &ThemesArg) -> anyhow::Result<()> {
    let table = util::apply_filter(data::load_table(&arg.input)?, arg.filter.as_ref())?;

    let file = File::open(&arg.catalog)
        .with_context(|| format!("failed to open '{}'", arg.catalog.display()))?;
    let catalog: ThemeCatalog = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("invalid theme catalog '{}'", arg.catalog.display()))?;

    let scores = score_themes(&table, &catalog, &arg.prefix);

    if arg.json {
        println!("{}", serde_json::to_string_pretty(&scores)?);
        return Ok(());
    }

    util::print_heading(&format!("Theme scores (prefix '{}')", arg.prefix));
    for score in &scores {
        println!("  - {}: {}", score.name, score.matching_responses);
    }
    Ok(())
}
