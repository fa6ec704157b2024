mod analyze;
mod check;
mod run;

use anyhow::Result;
use clap::Command;
use env_logger::Env;

pub mod consts {
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");
    pub const BIN_NAME: &str = "rescreen";
}

fn build_parser() -> Command {
    Command::new(consts::BIN_NAME)
        .bin_name(consts::BIN_NAME)
        .version(consts::VERSION)
        .author("Noam Teyssier")
        .about("Bootstrap stability analysis of CRISPR screens: resample test libraries, rescreen each cohort with crispr_screen, and measure how well the full-data hits are recovered.")
        .subcommand_required(true)
        .subcommand(run::cli::create_run_cli())
        .subcommand(analyze::cli::create_analyze_cli())
        .subcommand(check::cli::create_check_cli())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let app = build_parser();
    let matches = app.get_matches();

    match matches.subcommand() {
        //
        // BOOTSTRAP RUN
        //
        Some((run::cli::RUN_CMD, matches)) => {
            run::handlers::run_rescreen(matches)?;
        }

        //
        // ANALYSIS
        //
        Some((analyze::cli::ANALYZE_CMD, matches)) => {
            analyze::handlers::run_analyze(matches)?;
        }

        //
        // TOOL CHECK
        //
        Some((check::cli::CHECK_CMD, matches)) => {
            check::handlers::run_check(matches)?;
        }

        _ => unreachable!("Subcommand not found"),
    };

    Ok(())
}
