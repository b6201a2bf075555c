//! `empdb` runner.
//!
//! # Responsibility
//! - Resolve configuration and optional file logging.
//! - Run the film walkthroughs, the employee reports or the schema dump.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use empdb_core::crud::drop_films_table;
use empdb_core::db::migrations::{current_user_version, EMPLOYEE_SCHEMA_SQL};
use empdb_core::*;
use log::info;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
#[clap(propagate_version = true)]
struct Cli {
    /// TOML configuration file; EMPDB_* environment variables override it
    #[clap(short, long)]
    config: Option<PathBuf>,

    /// Directory for rotating log files; logging stays off when omitted
    #[clap(long)]
    log_dir: Option<PathBuf>,

    /// Log level: trace, debug, info, warn or error
    #[clap(long)]
    log_level: Option<String>,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the films create/insert/read/update/delete walkthrough
    Crud {
        #[clap(short, long, value_enum, default_value_t = ApproachArg::All)]
        approach: ApproachArg,

        /// Run every approach against the configured database instead of a
        /// fresh in-memory one each
        #[clap(long)]
        shared: bool,

        /// Drop `films` from the configured database before running
        #[clap(long, requires = "shared")]
        reset: bool,
    },

    /// Run the eight employee reports against the configured database
    Reports {
        /// Seed the bundled sample dataset first
        #[clap(long)]
        seed_sample: bool,

        /// Print one JSON document instead of plain text
        #[clap(long)]
        json: bool,
    },

    /// Print the schema version and the employee DDL
    Schema,

    /// Print the resolved connection URL with the password masked
    Config,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ApproachArg {
    Raw,
    Builder,
    Orm,
    All,
}

impl ApproachArg {
    fn approaches(self) -> Vec<Approach> {
        match self {
            Self::Raw => vec![Approach::RawSql],
            Self::Builder => vec![Approach::Builder],
            Self::Orm => vec![Approach::Orm],
            Self::All => Approach::ALL.to_vec(),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(dir) = &cli.log_dir {
        let level = cli
            .log_level
            .clone()
            .unwrap_or_else(|| default_log_level().to_string());
        init_logging(&level, absolute_dir(dir)?).map_err(|err| anyhow!("{err}"))?;
    }

    let config = DatabaseConfig::load(cli.config.as_deref())
        .context("failed to load database configuration")?;
    info!(
        "event=cli_start module=cli status=ok version={} url={}",
        core_version(),
        config.redacted_url()
    );

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Commands::Crud {
            approach,
            shared,
            reset,
        } => run_crud(&config, approach, shared, reset, &mut out),
        Commands::Reports { seed_sample, json } => run_reports(&config, seed_sample, json, &mut out),
        Commands::Schema => {
            let conn = open_db_in_memory()?;
            writeln!(out, "schema version {}", current_user_version(&conn)?)?;
            writeln!(out, "{}", EMPLOYEE_SCHEMA_SQL.trim_end())?;
            Ok(())
        }
        Commands::Config => {
            writeln!(out, "{}", config.redacted_url())?;
            Ok(())
        }
    }
}

fn absolute_dir(dir: &Path) -> Result<PathBuf> {
    if dir.is_absolute() {
        return Ok(dir.to_path_buf());
    }
    Ok(std::env::current_dir()?.join(dir))
}

fn run_crud(
    config: &DatabaseConfig,
    approach: ApproachArg,
    shared: bool,
    reset: bool,
    out: &mut impl Write,
) -> Result<()> {
    let approaches = approach.approaches();
    let outcomes = if shared {
        let conn = open_configured(config)?;
        if reset {
            drop_films_table(&conn)?;
        }
        run_walkthroughs(WalkthroughDatabase::Shared(&conn), &approaches, out)
    } else {
        run_walkthroughs(WalkthroughDatabase::FreshInMemory, &approaches, out)
    };

    let mut failures = 0usize;
    for ApproachOutcome { approach, result } in outcomes {
        match result {
            Ok(_) => {}
            Err(err) if err.is_duplicate_table() => {
                failures += 1;
                eprintln!("{approach}: {err} (rerun with --reset to drop it)");
            }
            Err(err) => return Err(err).with_context(|| format!("{approach} walkthrough failed")),
        }
    }

    if failures > 0 {
        return Err(anyhow!("{failures} walkthrough(s) hit an existing films table"));
    }
    Ok(())
}

fn run_reports(
    config: &DatabaseConfig,
    seed_sample: bool,
    json: bool,
    out: &mut impl Write,
) -> Result<()> {
    let conn = open_configured(config)?;
    if seed_sample {
        let dataset = sample_dataset()?;
        let rows = SqliteEmployeeRepository::new(&conn).insert_dataset(&dataset)?;
        info!("event=cli_seed module=cli status=ok rows={rows}");
    }

    let reports = run_all(&conn)?;
    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(&reports)?)?;
        return Ok(());
    }

    writeln!(out, "# employee salaries")?;
    for row in &reports.employee_salaries {
        writeln!(
            out,
            "{}\t{}\t{}\t{}\t{}",
            row.emp_no,
            row.last_name,
            row.first_name,
            row.gender.as_db_str(),
            row.salary
        )?;
    }
    writeln!(out, "# hired in 1986")?;
    for row in &reports.hired_in_1986 {
        writeln!(out, "{}\t{}\t{}\t{}", row.emp_no, row.first_name, row.last_name, row.hire_date)?;
    }
    writeln!(out, "# department managers")?;
    for row in &reports.department_managers {
        writeln!(
            out,
            "{}\t{}\t{}\t{}\t{}\t{}\t{}",
            row.dept_no,
            row.dept_name,
            row.emp_no,
            row.last_name,
            row.first_name,
            row.from_date,
            row.to_date
        )?;
    }
    for (title, rows) in [
        ("employee departments", &reports.employee_departments),
        ("Sales", &reports.sales),
        ("Sales and Development", &reports.sales_and_development),
    ] {
        writeln!(out, "# {title}")?;
        for row in rows {
            writeln!(
                out,
                "{}\t{}\t{}\t{}",
                row.emp_no, row.last_name, row.first_name, row.dept_name
            )?;
        }
    }
    writeln!(out, "# Hercules B.")?;
    for row in &reports.hercules_b {
        writeln!(out, "{}\t{}\t{}", row.first_name, row.last_name, row.gender.as_db_str())?;
    }
    writeln!(out, "# last name frequencies")?;
    for row in &reports.last_name_frequencies {
        writeln!(out, "{}\t{}", row.last_name, row.frequency)?;
    }

    writeln!(out, "# summary")?;
    for (title, count) in reports.summary() {
        writeln!(out, "{title}: {count}")?;
    }
    Ok(())
}
