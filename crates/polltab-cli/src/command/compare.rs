use std::path::PathBuf;

use polltab_stats::contingency::{Association, ContingencyAnalyzer, ContingencyResult};

use crate::{data, util};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct CompareArg {
    /// CSV file with survey responses
    #[arg(long)]
    input: PathBuf,
    /// Grouping column (contingency rows)
    #[arg(long)]
    group: String,
    /// Question column (contingency columns)
    #[arg(long)]
    question: String,
    /// Keep only rows where a demographic column matches ('column=value')
    #[arg(long, value_parser = util::parse_filter)]
    filter: Option<(String, String)>,
    /// Skip the chi-square test and report only the deviation measure
    #[arg(long)]
    basic: bool,
    /// Emit JSON instead of text
    #[arg(long)]
    json: bool,
}

pub(crate) fn run(arg: &CompareArg) -> anyhow::Result<()> {
    let table = util::apply_filter(data::load_table(&arg.input)?, arg.filter.as_ref())?;

    let analyzer = if arg.basic {
        ContingencyAnalyzer::basic()
    } else {
        ContingencyAnalyzer::new()
    };
    let result = analyzer.cross_tabulate(&table, &arg.group, &arg.question)?;

    if arg.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    let Some(result) = result else {
        println!(
            "'{}' has fewer than 2 observed groups; nothing to compare.",
            arg.group
        );
        return Ok(());
    };
    print_result(&result);
    Ok(())
}

fn print_result(result: &ContingencyResult) {
    util::print_heading(&format!(
        "{} x {}",
        result.group_question, result.target_question
    ));

    let label_width = result
        .group_categories
        .iter()
        .map(String::len)
        .max()
        .unwrap_or(0)
        .max(result.group_question.len());

    print!("{:label_width$}", result.group_question);
    for category in &result.target_categories {
        print!("  {category:>12}");
    }
    println!();
    for (row, category) in result.group_categories.iter().enumerate() {
        print!("{category:label_width$}");
        for count in &result.counts[row] {
            print!("  {count:>12}");
        }
        println!();
    }
    println!();
    println!("Respondents counted: {}", result.grand_total);

    match &result.analysis {
        Association::ChiSquare {
            chi_square,
            p_value,
            degrees_of_freedom,
            cramers_v,
            significant,
        } => {
            println!("Chi-square: {chi_square:.4} (dof = {degrees_of_freedom})");
            println!("p-value: {p_value:.4}");
            println!("Cramér's V: {cramers_v:.4}");
            println!(
                "Association is {} at the 5% level.",
                if *significant {
                    "significant"
                } else {
                    "not significant"
                }
            );
        }
        Association::Basic {
            mean_absolute_deviation,
        } => {
            println!("Mean absolute deviation from independence: {mean_absolute_deviation:.4}");
            println!("(basic analysis; no chi-square test backend configured)");
        }
    }
}
