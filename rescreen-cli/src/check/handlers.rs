use anyhow::{Context, Result};
use clap::ArgMatches;

use rescreen_bootstrap::invoker::resolve_executable;
use rescreen_bootstrap::{CommandTool, ScreenTool};
use rescreen_core::consts::DEFAULT_TOOL;

pub fn run_check(matches: &ArgMatches) -> Result<()> {
    let default_tool = DEFAULT_TOOL.to_string();
    let tool = matches.get_one::<String>("tool").unwrap_or(&default_tool);

    let screen = CommandTool::new(tool.as_str());
    screen.check_available()?;

    let version = screen
        .version()
        .with_context(|| format!("Unable to query the version of `{}`", tool))?;

    if let Some(path) = resolve_executable(tool) {
        println!("{}\t{}", tool, path.display());
    }
    println!("{}", version);

    Ok(())
}
