use std::fmt::Display;
use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::Utc;
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;
use tracing::debug;

use classroom_dashboard::config::{self, OutputFormat, Settings};
use classroom_dashboard::import;
use classroom_dashboard::models::{Assessment, Course, Payment, Student, Task};
use classroom_dashboard::report;
use classroom_dashboard::seed::{self, Seeded};
use classroom_dashboard::session::Session;
use classroom_dashboard::{CollectionView, FilterState, HeadlineStats, SortOrder, StatusFilter, Tag};

#[derive(Parser)]
#[command(name = "classroom-dashboard")]
#[command(about = "Search, filter and summarize the classroom admin lists", long_about = None)]
struct Cli {
    #[command(flatten)]
    settings: Settings,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the records that pass a filter
    List {
        #[command(flatten)]
        view: ViewArgs,
        /// Numeric field to order results by
        #[arg(long)]
        sort: Option<String>,
        #[arg(long, requires = "sort")]
        desc: bool,
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Headline statistics plus the filtered result count
    Stats {
        #[command(flatten)]
        view: ViewArgs,
    },
    /// Generate a markdown report
    Report {
        #[command(flatten)]
        view: ViewArgs,
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
    },
    /// Add records from a CSV file to the seed data
    Import {
        #[arg(value_enum)]
        entity: Entity,
        #[arg(long)]
        csv: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Entity {
    Students,
    Courses,
    Tests,
    Tasks,
    Payments,
}

#[derive(Debug, Clone, Args)]
struct ViewArgs {
    #[arg(value_enum)]
    entity: Entity,
    /// Case-insensitive text to look for
    #[arg(long, default_value = "")]
    search: String,
    /// A status name, or "all"
    #[arg(long, default_value = "all")]
    status: String,
    /// Extra records to load on top of the seed data
    #[arg(long)]
    csv: Option<PathBuf>,
}

/// Everything a list page needs from its record type.
trait Page: HeadlineStats + Seeded + Serialize + DeserializeOwned + Display {}

impl<T> Page for T where T: HeadlineStats + Seeded + Serialize + DeserializeOwned + Display {}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    config::init_tracing(&cli.settings.log_filter)?;
    cli.settings.validate()?;

    let session = Session::signed_in(&cli.settings.user_email);
    debug!(email = %cli.settings.user_email, "session started");

    let entity = match &cli.command {
        Commands::List { view, .. } | Commands::Stats { view } | Commands::Report { view, .. } => {
            view.entity
        }
        Commands::Import { entity, .. } => *entity,
    };

    match entity {
        Entity::Students => run::<Student>(&cli, &session),
        Entity::Courses => run::<Course>(&cli, &session),
        Entity::Tests => run::<Assessment>(&cli, &session),
        Entity::Tasks => run::<Task>(&cli, &session),
        Entity::Payments => run::<Payment>(&cli, &session),
    }
}

fn run<R: Page>(cli: &Cli, session: &Session) -> anyhow::Result<()> {
    let format = cli.settings.format;

    match &cli.command {
        Commands::List {
            view: args,
            sort,
            desc,
            limit,
        } => {
            let view = load_view::<R>(args.csv.as_deref())?;
            let filter = parse_filter::<R>(args)?;
            let filtered = view.filter(&filter);

            let mut rows = match sort {
                Some(name) => {
                    let field = parse_tag::<R::Field>(name, "field")?;
                    let order = if *desc {
                        SortOrder::Descending
                    } else {
                        SortOrder::Ascending
                    };
                    filtered.sorted_by(field, order)
                }
                None => filtered.to_vec(),
            };
            let matched = rows.len();
            if let Some(limit) = limit {
                rows.truncate(*limit);
            }

            match format {
                OutputFormat::Json => {
                    let body = json!({
                        "search": filter.search(),
                        "status": filter.status(),
                        "total": view.len(),
                        "matched": matched,
                        "records": rows,
                    });
                    println!("{}", serde_json::to_string_pretty(&body)?);
                }
                OutputFormat::Table => {
                    if rows.is_empty() {
                        println!("No {} match this filter.", R::COLLECTION);
                    } else {
                        for record in &rows {
                            println!("- {record}");
                        }
                    }
                    println!("Showing {} of {} {}.", rows.len(), view.len(), R::COLLECTION);
                }
            }
        }
        Commands::Stats { view: args } => {
            let view = load_view::<R>(args.csv.as_deref())?;
            let filter = parse_filter::<R>(args)?;
            let stats = view.derive(&R::page_stats(), &filter);

            match format {
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&stats)?);
                }
                OutputFormat::Table => {
                    for stat in stats.iter() {
                        println!("{}: {}", stat.label, report::format_value(stat.value));
                    }
                }
            }
        }
        Commands::Report { view: args, out } => {
            let view = load_view::<R>(args.csv.as_deref())?;
            let filter = parse_filter::<R>(args)?;
            let today = Utc::now().date_naive();
            let report = report::build_report(session, &view, &filter, today);
            std::fs::write(out, report)
                .with_context(|| format!("failed to write {}", out.display()))?;
            println!("Report written to {}.", out.display());
        }
        Commands::Import { csv, .. } => {
            let mut view = seed::seeded_view::<R>()?;
            let summary = import::import_csv(&mut view, csv)?;

            match format {
                OutputFormat::Json => {
                    let body = json!({
                        "inserted": summary.inserted,
                        "skipped": summary.skipped,
                        "total": view.len(),
                    });
                    println!("{}", serde_json::to_string_pretty(&body)?);
                }
                OutputFormat::Table => {
                    println!(
                        "Inserted {} {} from {} ({} duplicates skipped, {} total).",
                        summary.inserted,
                        R::COLLECTION,
                        csv.display(),
                        summary.skipped,
                        view.len()
                    );
                }
            }
        }
    }

    Ok(())
}

fn load_view<R: Page>(csv: Option<&Path>) -> anyhow::Result<CollectionView<R>> {
    let mut view = seed::seeded_view::<R>()?;
    if let Some(path) = csv {
        let summary = import::import_csv(&mut view, path)?;
        if summary.skipped > 0 {
            eprintln!(
                "Skipped {} {} with ids already present.",
                summary.skipped,
                R::COLLECTION
            );
        }
    }
    Ok(view)
}

fn parse_filter<R: Page>(args: &ViewArgs) -> anyhow::Result<FilterState<R::Status>> {
    let status = StatusFilter::parse(&args.status).with_context(|| {
        format!(
            "unknown {} status '{}' (expected all, {})",
            R::ENTITY,
            args.status,
            <R::Status as Tag>::names().join(", ")
        )
    })?;
    Ok(FilterState::new(args.search.as_str(), status))
}

fn parse_tag<T: Tag>(value: &str, kind: &str) -> anyhow::Result<T> {
    T::parse(value).with_context(|| {
        format!(
            "unknown {} '{}' (expected one of {})",
            kind,
            value,
            T::names().join(", ")
        )
    })
}
