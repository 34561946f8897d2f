mod opt;

use std::io::stdout;

use clap::{CommandFactory, Parser};
use clap_complete::{generate, Shell};

use crate::opt::Opt;

/// Generate shell completions for the main trigana binary
#[derive(Debug, Parser)]
#[command(name = "trigana-generate-shell-completions", version)]
struct ShellSelect {
    /// Shell for which to generate completions
    #[arg(value_enum)]
    shell: Shell,
}

fn main() {
    let select = ShellSelect::parse();
    generate(select.shell, &mut Opt::command(), "trigana", &mut stdout());
}
