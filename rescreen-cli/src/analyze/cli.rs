use clap::{Arg, ArgAction, Command, arg, value_parser};

pub const ANALYZE_CMD: &str = "analyze";
pub const DEFAULT_OUTDIR: &str = "rescreen_analysis";

pub fn create_analyze_cli() -> Command {
    Command::new(ANALYZE_CMD)
        .author("Noam Teyssier")
        .about("Measure standard-set overlap and per-gene recovery across bootstrap cohorts.")
        .arg_required_else_help(true)
        .arg(arg!(-i --directory <directory> "Output directory of a previous `rescreen run`"))
        .arg(arg!(-s --standard <standard> "Result table to use as the standard [default: full screen]"))
        .arg(
            arg!(-f --fdr <fdr> "FDR threshold; rows at or above it are dropped [default: 0.1]")
                .value_parser(value_parser!(f64)),
        )
        .arg(arg!(--"keep-amalgams" "Keep amalgam pseudo-genes").action(ArgAction::SetTrue))
        .arg(arg!(--"amalgam-prefix" <prefix> "Gene name prefix of amalgam pseudo-genes [default: amalgam]"))
        .arg(
            Arg::new("score-column")
                .long("score-column")
                .num_args(1..)
                .action(ArgAction::Append)
                .help("Extra columns every result table must contain"),
        )
        .arg(
            arg!(-d --delimiter <delimiter> "Output delimiter [default: tab]")
                .value_parser(value_parser!(char)),
        )
        .arg(arg!(-o --outdir <outdir> "Directory to write tables into [default: rescreen_analysis]"))
        .arg(
            Arg::new("tables")
                .long("tables")
                .num_args(1..)
                .action(ArgAction::Append)
                .help("Tables to write: overlaps, recovery, subset_recovery [default: all]"),
        )
        .arg(arg!(--config <config> "TOML or YAML analysis configuration; flags take precedence"))
}
