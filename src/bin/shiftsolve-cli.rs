#![forbid(unsafe_code)]
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use shiftsolve::{calendar, demand, io, storage, GoodLpBackend};
use std::path::PathBuf;
#[cfg(feature = "logging")]
use tracing_subscriber::{fmt::Subscriber, EnvFilter};

/// Clinic shift rostering CLI: plan file in, schedule grid + vacancies out.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Enable logs (feature `logging`)
    #[arg(long, global = true)]
    log: bool,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Write a small sample plan file to start from
    InitPlan {
        #[arg(long, default_value = "plan.json")]
        path: PathBuf,
    },

    /// Validate a plan and print its resolved demand summary
    Check {
        #[arg(long)]
        plan: PathBuf,
    },

    /// Solve a plan and export schedule.csv, vacancies.csv, totals.csv
    /// and report.json
    Solve {
        #[arg(long)]
        plan: PathBuf,

        #[arg(long, default_value = "out")]
        out_dir: PathBuf,

        /// Solver wall-clock budget in seconds (overrides the plan config)
        #[arg(long)]
        budget: Option<u64>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    #[cfg(feature = "logging")]
    if cli.log {
        let _ = Subscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .try_init();
    }
    #[cfg(not(feature = "logging"))]
    let _ = cli.log;

    match cli.cmd {
        Commands::InitPlan { path } => {
            let plan = io::sample_plan();
            io::export_plan_json(&path, &plan)?;
            println!("sample plan written to {}", path.display());
        }

        Commands::Check { plan } => {
            let plan = io::load_plan(&plan)?;
            let days = calendar::expand(&plan.period)?;
            let table = demand::resolve(
                &plan.sites,
                &days,
                &plan.overrides,
                plan.config.alternating_saturday.as_ref(),
            );
            let operating = table.iter().filter(|(_, n)| *n > 0).count();
            println!(
                "plan ok: {} days, {} sites, {} staff, {} operating slots, total demand {}",
                days.len(),
                plan.sites.len(),
                plan.staff.len(),
                operating,
                table.total()
            );
        }

        Commands::Solve {
            plan,
            out_dir,
            budget,
        } => {
            let plan = io::load_plan(&plan)?;
            let mut config = plan.config.clone();
            if let Some(secs) = budget {
                config.time_budget_secs = secs;
            }

            let schedule = shiftsolve::solve_plan(&plan, &config, &GoodLpBackend)?;

            std::fs::create_dir_all(&out_dir)
                .with_context(|| format!("creating {}", out_dir.display()))?;
            io::export_schedule_csv(out_dir.join("schedule.csv"), &schedule)?;
            io::export_vacancies_csv(out_dir.join("vacancies.csv"), &schedule)?;
            io::export_totals_csv(out_dir.join("totals.csv"), &schedule)?;
            storage::save_report(out_dir.join("report.json"), &schedule)?;

            println!(
                "status: {} | objective: {:.1} | vacancies: {}",
                schedule.status,
                schedule.objective,
                schedule.vacancies.len()
            );
        }
    }

    Ok(())
}
