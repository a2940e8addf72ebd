use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use prettytable::{Cell, Row, Table};
use std::path::PathBuf;
use tracing::info;

use biogap::dates::DateStyle;
use biogap::environment::{require_api_key, Settings, GUARDIAN_API_KEY_VAR, NYTIMES_API_KEY_VAR};
use biogap::logging::configure_logging;
use biogap::sources::{nytimes, GuardianApi, IndependentArchive, NYTimesApi, WikipediaApi};
use biogap::subject::nytimes::{name_versions, normalized_name};
use biogap::xref::{CandidateTier, CrossReferenceReport, CrossReferencer, ObituarySource};

const VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (built ",
    env!("BUILD_TIMESTAMP"),
    ")"
);

#[derive(Parser)]
#[command(author, version = VERSION, about = "Find obituary subjects without a Wikipedia biography", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Cross-reference a month of obituaries against the NYTimes and check Wikipedia
    Candidates {
        #[arg(short, long)]
        year: i32,

        /// Month number (1-12)
        #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..=12))]
        month: u32,

        /// Source whose obituaries are checked
        #[arg(short, long, value_enum, default_value_t = SourceArg::Guardian)]
        source: SourceArg,
    },

    /// List the subjects of a month of NYTimes obituaries
    Nytimes {
        #[arg(short, long)]
        year: i32,

        #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..=12))]
        month: u32,
    },

    /// Print the name versions of a `Surname, Firstnames` string
    Versions {
        /// Raw name, e.g. "ROCKEFELLER, JOHN D JR"
        raw: String,
    },

    /// Extract birth and death dates from a text file
    Dates {
        #[arg(short, long, value_enum)]
        style: StyleArg,

        file: PathBuf,
    },

    /// Build an Independent dataset row from an article page
    IndependentRow {
        #[arg(short, long)]
        id: String,

        #[arg(short, long)]
        url: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum SourceArg {
    Guardian,
    Independent,
}

#[derive(Clone, Copy, ValueEnum)]
enum StyleArg {
    Guardian,
    Independent,
}

impl From<StyleArg> for DateStyle {
    fn from(style: StyleArg) -> Self {
        match style {
            StyleArg::Guardian => DateStyle::Guardian,
            StyleArg::Independent => DateStyle::Independent,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    configure_logging();

    let cli = Cli::parse();
    let settings = Settings::from_env();

    match cli.command {
        Commands::Candidates {
            year,
            month,
            source,
        } => {
            let report = match source {
                SourceArg::Guardian => {
                    let api_key = require_api_key(GUARDIAN_API_KEY_VAR)?;
                    let guardian = GuardianApi::new(api_key)?;
                    find_candidates(&guardian, &settings, year, month).await?
                }
                SourceArg::Independent => {
                    let archive = IndependentArchive::new(&settings.independent_csv_path)?;
                    find_candidates(&archive, &settings, year, month).await?
                }
            };
            print_report(&report);
        }

        Commands::Nytimes { year, month } => {
            let api_key = require_api_key(NYTIMES_API_KEY_VAR)?;
            let nytimes_api = NYTimesApi::new(api_key)?;
            let obituaries = nytimes_api
                .resolve_obituaries_of_month(year, month)
                .await
                .with_context(|| format!("Failed to resolve NYTimes obituaries of {}/{}", year, month))?;

            for obituary in &obituaries {
                println!("{}", nytimes::listing_name(obituary));
            }
            println!(
                "\n{} obituaries in {}/{}",
                obituaries.len().to_string().bright_blue(),
                year,
                month
            );
        }

        Commands::Versions { raw } => {
            println!("Name versions of '{}':", raw);
            for version in name_versions(&raw) {
                println!("  - {}", version);
            }
            println!("Normalized: {}", normalized_name(&raw).bright_green());
        }

        Commands::Dates { style, file } => {
            let text = std::fs::read_to_string(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let dates = DateStyle::from(style).extract(&text);
            println!("{}: {}", "Born".bright_blue(), display_date(dates.birth));
            println!("{}: {}", "Died".bright_blue(), display_date(dates.death));
        }

        Commands::IndependentRow { id, url } => {
            let archive = IndependentArchive::new(&settings.independent_csv_path)?;
            let row = archive
                .fetch_dataset_row(&id, &url)
                .await
                .with_context(|| format!("Failed to build dataset row for {}", url))?;
            let mut writer = csv::WriterBuilder::new()
                .delimiter(b';')
                .has_headers(false)
                .from_writer(std::io::stdout());
            writer.serialize(&row)?;
            writer.flush()?;
        }
    }

    Ok(())
}

async fn find_candidates<S: ObituarySource>(
    source: &S,
    settings: &Settings,
    year: i32,
    month: u32,
) -> Result<CrossReferenceReport> {
    let nytimes_api = NYTimesApi::new(require_api_key(NYTIMES_API_KEY_VAR)?)?;
    let wikipedia = WikipediaApi::with_api_url(&settings.wikipedia_api_url)?;

    info!(
        "Cross-referencing {} against NYTimes with threshold {} and advisory floor {:?}",
        source.source_id(),
        settings.score_threshold,
        settings.advisory_floor
    );

    CrossReferencer::new(source, &nytimes_api, &wikipedia, settings.match_config())
        .cross_reference_month(year, month)
        .await
        .with_context(|| format!("Failed to cross-reference {}/{}", year, month))
}

fn print_report(report: &CrossReferenceReport) {
    println!("\n{}", "═".repeat(80).bright_blue());
    println!(
        "{}  {}/{}",
        "CANDIDATES".bright_blue(),
        report.year,
        report.month
    );
    println!("{}", "═".repeat(80).bright_blue());

    if report.candidates.is_empty() {
        println!("{}", "No candidates found".dimmed());
    }
    for candidate in &report.candidates {
        let heading = format!("{}: {}", candidate.tier, candidate.name);
        let heading = match candidate.tier {
            CandidateTier::Strong => heading.bright_green().bold(),
            CandidateTier::Weak => heading.green(),
            CandidateTier::Possible => heading.green().italic(),
        };
        println!("{}", heading);
        println!("  {}", candidate.source_web_url);
        println!("  {}", candidate.comparison_web_url);
    }

    if !report.review.is_empty() {
        println!("\n{}", "Check manually".bright_yellow());
        println!("{}", "─".repeat(80).dimmed());
        for result in &report.review {
            println!(
                "{}",
                format!(
                    "Matching score = {}: '{}' - '{}'",
                    result.score, result.source.subject.normalized_name, result.matched_name
                )
                .yellow()
            );
        }
    }

    let mut table = Table::new();
    table.add_row(Row::new(vec![
        Cell::new("Evaluated matches"),
        Cell::new("Strong"),
        Cell::new("Weak"),
        Cell::new("Possible"),
        Cell::new("Review"),
    ]));
    table.add_row(Row::new(vec![
        Cell::new(&report.evaluated_matches.to_string()),
        Cell::new(&report.count_tier(CandidateTier::Strong).to_string()),
        Cell::new(&report.count_tier(CandidateTier::Weak).to_string()),
        Cell::new(&report.count_tier(CandidateTier::Possible).to_string()),
        Cell::new(&report.review.len().to_string()),
    ]));
    println!();
    table.printstd();
}

fn display_date(date: Option<chrono::NaiveDate>) -> String {
    date.map(|d| d.format("%-d %B %Y").to_string())
        .unwrap_or_else(|| "unresolved".to_string())
}
