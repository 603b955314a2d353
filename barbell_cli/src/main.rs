use barbell_core::book::{AthleteBook, BOOK_FILE};
use barbell_core::weights::write_table_csv;
use barbell_core::*;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "barbell")]
#[command(about = "Training plan notation, weight tables and plan import/export")]
#[command(long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Use this config file instead of the default one
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a percentage-of-max weight table
    Table {
        /// One-rep max in kg
        #[arg(long = "max")]
        one_rep_max: f64,

        /// Rounding step in kg (defaults to the configured step)
        #[arg(long)]
        step: Option<f64>,

        /// Comma separated percentages, e.g. 0.5,0.6,0.7
        #[arg(long, value_delimiter = ',')]
        percents: Option<Vec<f64>>,

        /// Write CSV instead of a text table
        #[arg(long)]
        csv: bool,
    },

    /// Parse series notation and print the sets as JSON
    Parse {
        text: String,

        /// Fail if any fragment was skipped or a set is invalid
        #[arg(long)]
        strict: bool,
    },

    /// Format sets given as JSON into series notation
    Format { json: String },

    /// Import a plan document (plain text) into the athlete book
    Import {
        file: PathBuf,

        /// Show what would be imported without saving
        #[arg(long)]
        dry_run: bool,
    },

    /// Export an athlete's plans as a plan document
    Export {
        name: String,

        /// Write to a file instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// List athletes in the athlete book
    Athletes {
        /// Also print weight tables for every recorded PM
        #[arg(long)]
        tables: bool,

        /// Also print each plan's exercise targets
        #[arg(long)]
        plans: bool,
    },

    /// Write the default configuration file for editing
    InitConfig {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn main() {
    // Initialize logging; warnings the user needs are printed by the commands
    barbell_core::logging::init_with_level("error");

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    if let Commands::InitConfig { force } = cli.command {
        let path = cli.config.unwrap_or_else(Config::default_config_path);
        return cmd_init_config(&path, force);
    }

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    let data_dir = cli
        .data_dir
        .clone()
        .unwrap_or_else(|| config.data.data_dir.clone());
    let book_path = data_dir.join(BOOK_FILE);
    tracing::debug!("Using athlete book at {:?}", book_path);
    let today = chrono::Local::now().date_naive();

    match cli.command {
        Commands::Table {
            one_rep_max,
            step,
            percents,
            csv,
        } => cmd_table(one_rep_max, step, percents, csv, &config),
        Commands::Parse { text, strict } => cmd_parse(&text, strict, &config),
        Commands::Format { json } => cmd_format(&json, &config),
        Commands::Import { file, dry_run } => {
            cmd_import(&file, dry_run, &book_path, today, &config)
        }
        Commands::Export { name, output } => {
            cmd_export(&name, output.as_deref(), &book_path, today, &config)
        }
        Commands::Athletes { tables, plans } => cmd_athletes(tables, plans, &book_path, &config),
        Commands::InitConfig { .. } => Ok(()),
    }
}

fn cmd_table(
    one_rep_max: f64,
    step: Option<f64>,
    percents: Option<Vec<f64>>,
    csv: bool,
    config: &Config,
) -> Result<()> {
    let step = match step {
        Some(step) => RoundingStep::new(step)?,
        None => config.weights.rounding_step,
    };
    let percents = percents.unwrap_or_else(|| config.weights.percents.clone());
    let rows = generate_weight_table(one_rep_max, &percents, step);

    if csv {
        write_table_csv(&rows, std::io::stdout().lock())?;
        return Ok(());
    }

    println!("PM {} {} (step {})", one_rep_max, config.vocabulary.unit, step);
    print_rows(&rows, &config.vocabulary);
    Ok(())
}

fn print_rows(rows: &[PercentRow], vocab: &Vocabulary) {
    for row in rows {
        println!(
            "  {:>4}%  {:>7} {}",
            (row.percent * 100.0).round(),
            row.weight,
            vocab.unit
        );
    }
}

fn cmd_parse(text: &str, strict: bool, config: &Config) -> Result<()> {
    let codec = SeriesCodec::new(&config.vocabulary)?;
    let parsed = codec.parse(text);

    println!("{}", serde_json::to_string_pretty(&parsed)?);

    if strict && (parsed.sets.is_empty() || !parsed.is_clean()) {
        return Err(Error::Other(format!(
            "Series '{}' did not parse cleanly ({} skipped)",
            text.trim(),
            parsed.skipped.len()
        )));
    }
    Ok(())
}

fn cmd_format(json: &str, config: &Config) -> Result<()> {
    let series: Vec<SeriesSet> = serde_json::from_str(json)?;
    if !validate_series(&series) {
        eprintln!("Warning: series contains invalid sets");
    }
    println!("{}", format_series(&series, &config.vocabulary));
    Ok(())
}

fn cmd_import(
    file: &Path,
    dry_run: bool,
    book_path: &Path,
    today: chrono::NaiveDate,
    config: &Config,
) -> Result<()> {
    let text = std::fs::read_to_string(file)?;
    let report = import_plan_text(&text, &config.vocabulary, today)?;
    let data = &report.data;

    println!("Athlete: {}", data.athlete_name);
    for lift in Lift::ALL {
        if let Some(pm) = data.pm(lift) {
            println!(
                "  {}: {} {}",
                config.vocabulary.lift_name(lift),
                pm,
                config.vocabulary.unit
            );
        }
    }
    println!("Plans: {}", data.plans.len());

    for warning in &report.warnings {
        eprintln!("Warning: {}", warning.describe(&config.vocabulary));
    }

    if dry_run {
        println!("\n[Dry run - athlete book not updated]");
        return Ok(());
    }

    let outcome = AthleteBook::update(book_path, |book| {
        Ok(book.upsert_import(
            data,
            &config.vocabulary,
            config.weights.rounding_step,
            today,
        ))
    })?;

    println!(
        "\n✓ {} athlete {} ({} plans added)",
        if outcome.created { "Created" } else { "Updated" },
        outcome.athlete_name,
        outcome.plans_added
    );
    Ok(())
}

fn cmd_export(
    name: &str,
    output: Option<&Path>,
    book_path: &Path,
    today: chrono::NaiveDate,
    config: &Config,
) -> Result<()> {
    let book = AthleteBook::load(book_path)?;
    let athlete = book.athlete(name)?;

    let doc = ExportDocument::from_record(athlete, &config.vocabulary);
    let text = render_text(&build_paragraphs(&doc, &config.vocabulary, today));

    match output {
        Some(path) => {
            std::fs::write(path, text)?;
            println!("✓ Exported {} to {}", athlete.name, path.display());
        }
        None => print!("{}", text),
    }
    Ok(())
}

fn cmd_athletes(tables: bool, plans: bool, book_path: &Path, config: &Config) -> Result<()> {
    let book = AthleteBook::load(book_path)?;
    if book.athletes.is_empty() {
        println!("No athletes yet - import a plan first.");
        return Ok(());
    }

    let vocab = &config.vocabulary;
    for athlete in &book.athletes {
        let pms = Lift::ALL
            .iter()
            .map(|lift| match athlete.pm(*lift) {
                Some(pm) => format!("{} {} {}", vocab.lift_name(*lift), pm, vocab.unit),
                None => format!("{} -", vocab.lift_name(*lift)),
            })
            .collect::<Vec<_>>()
            .join(", ");
        println!("{}: {} ({} plans)", athlete.name, pms, athlete.plans.len());

        if tables {
            for table in athlete.weight_tables(&config.weights.percents) {
                println!(
                    "  {} ({} {}):",
                    vocab.lift_name(table.lift),
                    table.one_rep_max,
                    vocab.unit
                );
                print_rows(&table.rows, vocab);
            }
        }

        if plans {
            for plan in athlete.sorted_plans() {
                let test = if plan.kind == PlanKind::Test {
                    format!(" - {}", vocab.test_marker)
                } else {
                    String::new()
                };
                println!(
                    "  {} {}, {} {}{}:",
                    vocab.week_marker,
                    plan.week,
                    vocab.workout_marker,
                    plan.workout_number,
                    test
                );
                for exercise in &plan.exercises {
                    if let Some(target) = exercise.target() {
                        println!(
                            "    {}: {} {}, {} sets of {}",
                            vocab.lift_name(exercise.lift),
                            target.weight,
                            vocab.unit,
                            target.sets,
                            target.reps
                        );
                    }
                }
            }
        }
    }
    Ok(())
}

fn cmd_init_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        return Err(Error::Config(format!(
            "{} already exists, pass --force to overwrite",
            path.display()
        )));
    }

    Config::default().save_to(path)?;
    println!("✓ Wrote default config to {}", path.display());
    Ok(())
}
