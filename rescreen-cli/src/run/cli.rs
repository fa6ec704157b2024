use clap::{Arg, ArgAction, Command, arg, value_parser};

pub const RUN_CMD: &str = "run";

pub fn create_run_cli() -> Command {
    Command::new(RUN_CMD)
        .author("Noam Teyssier")
        .about("Run the full screen and the bootstrap cohorts through crispr_screen.")
        .arg_required_else_help(true)
        .arg(arg!(-i --table <table> "Count matrix produced by sgcount (Guide, Gene, samples...)"))
        .arg(
            Arg::new("reference")
                .short('c')
                .long("reference")
                .num_args(1..)
                .action(ArgAction::Append)
                .help("Reference (control) libraries"),
        )
        .arg(
            Arg::new("test")
                .short('t')
                .long("test")
                .num_args(1..)
                .action(ArgAction::Append)
                .help("Test libraries; every non-reference sample when omitted"),
        )
        .arg(
            Arg::new("exclude")
                .short('e')
                .long("exclude")
                .num_args(1..)
                .action(ArgAction::Append)
                .help("Samples to leave out when deriving test libraries"),
        )
        .arg(arg!(-o --prefix <prefix> "Output directory [default: bootstraps]"))
        .arg(arg!(--overwrite "Replace the output directory if it exists").action(ArgAction::SetTrue))
        .arg(arg!(-g --method <method> "Gene aggregation method (geopagg, rra, inc) [default: geopagg]"))
        .arg(arg!(--"use-product" "Use the product of sgRNA scores").action(ArgAction::SetTrue))
        .arg(
            arg!(--"min-base-mean" <value> "Minimum base mean for sgRNA inclusion")
                .value_parser(value_parser!(u64)),
        )
        .arg(
            arg!(--"without-replacement" "Sample libraries without replacement")
                .action(ArgAction::SetTrue),
        )
        .arg(arg!(--step <step> "Subset size step [default: 1]").value_parser(value_parser!(usize)))
        .arg(
            arg!(--"num-reps" <reps> "Replicates per subset size [default: 50]")
                .value_parser(value_parser!(usize)),
        )
        .arg(arg!(--seed <seed> "Random seed [default: 42]").value_parser(value_parser!(u64)))
        .arg(
            arg!(-T --threads <threads> "Concurrent crispr_screen processes [default: all cores]")
                .value_parser(value_parser!(usize)),
        )
        .arg(arg!(--tool <tool> "Screen executable name or path [default: crispr_screen]"))
        .arg(
            arg!(--"tool-threads" <threads> "Threads given to each crispr_screen process [default: 1]")
                .value_parser(value_parser!(usize)),
        )
        .arg(
            arg!(--timeout <seconds> "Kill a screen after this many seconds")
                .value_parser(value_parser!(u64)),
        )
        .arg(arg!(--"skip-full" "Only run the bootstrap cohorts").action(ArgAction::SetTrue))
        .arg(arg!(--config <config> "TOML or YAML run configuration; flags take precedence"))
}
