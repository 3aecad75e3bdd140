use clap::{Parser, Subcommand};

mod compare;
mod summarize;
mod themes;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about = "Batch analysis of categorical survey responses", long_about = None)]
pub(crate) struct CommandArgs {
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Frequency table and summary metrics for one question
    Summarize(#[clap(flatten)] summarize::SummarizeArg),
    /// Cross-tabulate a question against a grouping variable
    Compare(#[clap(flatten)] compare::CompareArg),
    /// Score named question groups by a marker prefix
    Themes(#[clap(flatten)] themes::ThemesArg),
}

pub(crate) fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode {
        Mode::Summarize(arg) => summarize::run(&arg)?,
        Mode::Compare(arg) => compare::run(&arg)?,
        Mode::Themes(arg) => themes::run(&arg)?,
    }
    Ok(())
}
