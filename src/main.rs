use clap::{Parser, Subcommand};
use rowfmt::{ParseOptions, RenderOptions};
use std::error::Error;
use std::path::PathBuf;
use url::Url;

#[derive(Parser)]
#[command(version, about = "Convert rich-text markup to plain text plus formatting ranges", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Strip markup, printing the encoded ranges then the plain text
    Parse {
        /// Markup file to read (stdin if omitted)
        input: Option<PathBuf>,

        /// Print the JSON envelope instead of the two text outputs
        #[arg(long)]
        json: bool,

        /// Fail on any markup error instead of recovering
        #[arg(long)]
        strict: bool,

        /// Base URL for resolving relative link targets
        #[arg(long, value_name = "URL")]
        base_url: Option<Url>,
    },
    /// Re-apply encoded ranges to plain text, printing markup
    Render {
        /// Encoded ranges, e.g. "[0, 0, 2, b]"
        #[arg(long)]
        formatting: String,

        /// Plain text file to read (stdin if omitted)
        input: Option<PathBuf>,

        /// Markup inserted between rows
        #[arg(long, default_value = "<br>")]
        line_break: String,
    },
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let printed = match cli.command {
        Commands::Parse {
            input,
            json,
            strict,
            base_url,
        } => {
            let mut opts = ParseOptions {
                strict,
                ..ParseOptions::default()
            };
            if let Some(base_url) = base_url {
                opts.base_url = base_url;
            }
            let text = rowfmt::read_input(input.as_deref())?;
            rowfmt::run_parse(&text, json, &opts)?
        }
        Commands::Render {
            formatting,
            input,
            line_break,
        } => {
            let text = rowfmt::read_input(input.as_deref())?;
            rowfmt::run_render(&text, &formatting, &RenderOptions { line_break })?
        }
    };

    println!("{}", printed);
    Ok(())
}
