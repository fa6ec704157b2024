use clap::{Command, arg};

pub const CHECK_CMD: &str = "check";

pub fn create_check_cli() -> Command {
    Command::new(CHECK_CMD)
        .author("Noam Teyssier")
        .about("Check that the screen executable can be found and report its version.")
        .arg(arg!(--tool <tool> "Screen executable name or path [default: crispr_screen]"))
}
