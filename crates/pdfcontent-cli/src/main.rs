mod cli;
mod format_cmd;
mod page_cmd;
mod page_range;
mod shared;
mod state_cmd;

use clap::Parser;
use cli::Cli;

fn main() {
    let cli = Cli::parse();
    shared::init_logging(cli.verbose);

    let result = match cli.command {
        cli::Commands::Format { ref file } => format_cmd::run(file),
        cli::Commands::State { ref file, format } => state_cmd::run(file, format),
        cli::Commands::Page {
            ref file,
            ref pages,
            format,
        } => page_cmd::run(file, pages.as_deref(), format),
    };

    if let Err(code) = result {
        std::process::exit(code);
    }
}
