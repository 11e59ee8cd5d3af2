use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};

/// Re-serialize PDF content streams and inspect the graphics state they produce.
#[derive(Debug, Parser)]
#[command(name = "pdfcontent", about, version)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace). RUST_LOG overrides.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Tokenize a raw content stream and print it re-serialized, one operator per line
    Format {
        /// Path to the content stream file
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Run a raw content stream with empty resources and print the final state
    State {
        /// Path to the content stream file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Run the content streams of PDF pages and report operator counts and final state
    Page {
        /// Path to the PDF file
        #[arg(value_name = "PDF")]
        file: PathBuf,

        /// Page range (e.g. '1,3-5'). Default: all pages
        #[arg(long)]
        pages: Option<String>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
}

/// Output format for the `state` and `page` subcommands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Plain text (key: value lines)
    Text,
    /// JSON output
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_format_subcommand() {
        let cli = Cli::parse_from(["pdfcontent", "format", "stream.bin"]);
        match cli.command {
            Commands::Format { ref file } => assert_eq!(file, &PathBuf::from("stream.bin")),
            _ => panic!("expected Format subcommand"),
        }
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn state_defaults_to_text() {
        let cli = Cli::parse_from(["pdfcontent", "state", "stream.bin"]);
        match cli.command {
            Commands::State { format, .. } => assert_eq!(format, OutputFormat::Text),
            _ => panic!("expected State subcommand"),
        }
    }

    #[test]
    fn parse_page_with_pages_and_format() {
        let cli = Cli::parse_from([
            "pdfcontent",
            "page",
            "doc.pdf",
            "--pages",
            "1,3-5",
            "--format",
            "json",
        ]);
        match cli.command {
            Commands::Page {
                ref file,
                ref pages,
                format,
            } => {
                assert_eq!(file, &PathBuf::from("doc.pdf"));
                assert_eq!(pages.as_deref(), Some("1,3-5"));
                assert_eq!(format, OutputFormat::Json);
            }
            _ => panic!("expected Page subcommand"),
        }
    }

    #[test]
    fn verbose_flag_counts_and_is_global() {
        let cli = Cli::parse_from(["pdfcontent", "state", "-vv", "stream.bin"]);
        assert_eq!(cli.verbose, 2);
        let cli = Cli::parse_from(["pdfcontent", "-v", "format", "stream.bin"]);
        assert_eq!(cli.verbose, 1);
    }

    #[test]
    fn unknown_format_is_rejected() {
        let result = Cli::try_parse_from(["pdfcontent", "state", "s.bin", "--format", "csv"]);
        assert!(result.is_err());
    }

    #[test]
    fn missing_subcommand_is_error() {
        assert!(Cli::try_parse_from(["pdfcontent"]).is_err());
    }
}
