use std::path::PathBuf;

use polltab_stats::{
    frequency::{CategoryPolicy, FrequencyTable},
    summary::QuestionSummary,
};
use serde::Serialize;

use crate::{data, util};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct SummarizeArg {
    /// CSV file with survey responses
    #[arg(long)]
    input: PathBuf,
    /// Question column to summarize
    #[arg(long)]
    question: String,
    /// Keep only rows where a demographic column matches ('column=value')
    #[arg(long, value_parser = util::parse_filter)]
    filter: Option<(String, String)>,
    /// Produce one summary per distinct value of this column
    #[arg(long)]
    group_by: Option<String>,
    /// Expected category labels in display order (comma separated)
    #[arg(long, value_delimiter = ',')]
    categories: Vec<String>,
    /// Fail on observed categories outside --categories
    #[arg(long, requires = "categories")]
    strict: bool,
    /// Emit JSON instead of text
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Serialize)]
struct SummaryReport {
    summary: QuestionSummary,
    /// Frequency as displayed: the expected-category table when
    /// `--categories` is given, the natural one otherwise.
    frequency: FrequencyTable,
}

#[derive(Debug, Serialize)]
struct GroupReport {
    group: String,
    summary: QuestionSummary,
}

pub(crate) fn run(arg: &SummarizeArg) -> anyhow::Result<()> {
    let table = util::apply_filter(data::load_table(&arg.input)?, arg.filter.as_ref())?;

    if let Some(group_by) = &arg.group_by {
        let grouped = QuestionSummary::summarize_by_group(&table, group_by, &arg.question)?;
        let reports: Vec<GroupReport> = grouped
            .into_iter()
            .map(|(group, summary)| GroupReport { group, summary })
            .collect();
        if arg.json {
            println!("{}", serde_json::to_string_pretty(&reports)?);
        } else {
            for report in &reports {
                util::print_heading(&format!(
                    "{} — {} = {}",
                    arg.question, group_by, report.group
                ));
                print_summary(&report.summary, &report.summary.frequency);
            }
        }
        return Ok(());
    }

    let summary = QuestionSummary::summarize(&table, &arg.question)?;
    let frequency = if arg.categories.is_empty() {
        summary.frequency.clone()
    } else {
        let policy = if arg.strict {
            CategoryPolicy::Strict
        } else {
            CategoryPolicy::Lenient
        };
        FrequencyTable::tabulate_expected(&table, &arg.question, &arg.categories, policy)?
    };

    if arg.json {
        let report = SummaryReport { summary, frequency };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        util::print_heading(&arg.question);
        print_summary(&summary, &frequency);
    }
    Ok(())
}

fn print_summary(summary: &QuestionSummary, frequency: &FrequencyTable) {
    if summary.total_responses == 0 {
        println!("No responses recorded.");
        return;
    }

    println!("Total responses: {}", summary.total_responses);
    println!();
    for (category, count) in frequency.iter() {
        println!(
            "  - {category}: {count} ({:.1}%)",
            frequency.percentage(category)
        );
    }
    println!();
    if let Some(mode) = &summary.mode {
        println!(
            "Mode: {mode} ({} responses, {:.1}%)",
            summary.mode_count, summary.mode_percentage
        );
    }
    println!("Entropy: {:.3} bits", summary.entropy_bits);
    println!("Diversity index: {:.3}", summary.diversity_index);
}
