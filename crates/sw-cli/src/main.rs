#![forbid(unsafe_code)]

//! seqwire CLI - parse, regenerate, and render signal diagrams.
//!
//! # Commands
//!
//! - `parse`: Output the typed AST (or the raw parse tree) as JSON
//! - `generate`: Regenerate compact diagram text from a parsed diagram
//! - `validate`: Check input for errors and report the result
//! - `render`: Submit the diagram to websequencediagrams.com and fetch the image

use std::io::{self, Read, Write};
use std::path::Path;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use sw_client::RenderClient;
use tracing::{debug, info, warn};

/// seqwire CLI - parse, regenerate, and render signal diagrams.
#[derive(Debug, Parser)]
#[command(
    name = "seqwire",
    version,
    about = "seqwire CLI - parse, regenerate, and render signal diagrams",
    long_about = "A toolkit for the seqwire signal DSL.\n\n\
        Parses actor-to-actor message diagrams (alice->bob:hello) into a\n\
        typed AST, regenerates compact diagram text, and renders diagrams\n\
        through the websequencediagrams.com service."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable verbose logging (can be repeated for more detail: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Parse a diagram and output its AST as JSON.
    Parse {
        /// Input file path or "-" for stdin. If omitted, reads from stdin.
        #[arg(default_value = "-")]
        input: String,

        /// Output the raw labeled parse tree instead of the typed AST
        #[arg(long)]
        raw: bool,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Regenerate compact diagram text from a parsed diagram.
    Generate {
        /// Input file path or "-" for stdin.
        #[arg(default_value = "-")]
        input: String,

        /// Output file path. If omitted, writes to stdout.
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Validate a diagram and report the result.
    Validate {
        /// Input file path or "-" for stdin.
        #[arg(default_value = "-")]
        input: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Render a diagram through the websequencediagrams.com service.
    Render {
        /// Input file path or "-" for stdin.
        #[arg(default_value = "-")]
        input: String,

        /// Service style selector (e.g. default, qsd, napkin)
        #[arg(short, long, default_value = sw_client::DEFAULT_STYLE)]
        style: String,

        /// Output file path for the image bytes. If omitted, writes to stdout.
        #[arg(short, long)]
        output: Option<String>,

        /// Print the image locator instead of downloading the image
        #[arg(long)]
        url_only: bool,
    },
}

/// Result of validating a diagram.
#[derive(Debug, Serialize)]
struct ValidateReport {
    valid: bool,
    statements: usize,
    error: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose, cli.quiet);

    match cli.command {
        Command::Parse { input, raw, pretty } => cmd_parse(&input, raw, pretty),

        Command::Generate { input, output } => cmd_generate(&input, output.as_deref()),

        Command::Validate { input, json } => cmd_validate(&input, json),

        Command::Render {
            input,
            style,
            output,
            url_only,
        } => cmd_render(&input, &style, output.as_deref(), url_only),
    }
}

fn init_tracing(verbose: u8, quiet: bool) {
    let filter = if quiet {
        "error"
    } else {
        match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .without_time()
        .try_init();
}

fn load_input(input: &str) -> Result<String> {
    if input == "-" {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read from stdin")?;
        Ok(buffer)
    } else if Path::new(input).exists() {
        std::fs::read_to_string(input).context(format!("Failed to read file: {input}"))
    } else {
        // Treat as inline diagram text
        Ok(input.to_string())
    }
}

fn write_output(output: Option<&str>, content: &str) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, content).context(format!("Failed to write to: {path}"))?;
            info!("Wrote output to: {path}");
        }
        None => {
            io::stdout()
                .write_all(content.as_bytes())
                .context("Failed to write to stdout")?;
        }
    }
    Ok(())
}

fn write_output_bytes(output: Option<&str>, content: &[u8]) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, content).context(format!("Failed to write to: {path}"))?;
            info!("Wrote output to: {path}");
        }
        None => {
            io::stdout()
                .write_all(content)
                .context("Failed to write to stdout")?;
        }
    }
    Ok(())
}

fn cmd_parse(input: &str, raw: bool, pretty: bool) -> Result<()> {
    let source = load_input(input)?;

    let output = if raw {
        let (tree, rest) = sw_parser::parse_tree(&source)?;
        if !rest.is_empty() {
            warn!("unparsed trailing input: {rest:?}");
        }
        to_json(&tree, pretty)?
    } else {
        let diagram = sw_parser::parse(&source)?;
        to_json(&diagram, pretty)?
    };

    println!("{output}");
    Ok(())
}

fn cmd_generate(input: &str, output: Option<&str>) -> Result<()> {
    let source = load_input(input)?;
    let diagram = sw_parser::parse(&source)?;
    info!("parsed {} statement(s)", diagram.len());

    let mut rendered = sw_codegen::render(&diagram);
    rendered.push('\n');
    write_output(output, &rendered)
}

fn cmd_validate(input: &str, json_output: bool) -> Result<()> {
    let source = load_input(input)?;

    let report = match sw_parser::parse(&source) {
        Ok(diagram) => ValidateReport {
            valid: true,
            statements: diagram.len(),
            error: None,
        },
        Err(error) => ValidateReport {
            valid: false,
            statements: 0,
            error: Some(error.to_string()),
        },
    };

    if json_output {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else if report.valid {
        println!("✓ Valid diagram ({} statement(s))", report.statements);
    } else {
        println!("✗ Invalid diagram");
        if let Some(error) = &report.error {
            println!("  {error}");
        }
    }

    if !report.valid {
        std::process::exit(1);
    }
    Ok(())
}

fn cmd_render(input: &str, style: &str, output: Option<&str>, url_only: bool) -> Result<()> {
    let source = load_input(input)?;

    // Fail locally before going to the network; the service receives the
    // original text, not the AST.
    let diagram = sw_parser::parse(&source).context("input does not parse as a diagram")?;
    debug!("submitting {} statement(s) to the render service", diagram.len());

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;
    let client = RenderClient::new()?;

    if url_only {
        let locator = runtime.block_on(client.request_image(&source, style))?;
        println!("{locator}");
        return Ok(());
    }

    let image = runtime.block_on(client.fetch_image(&source, style))?;
    info!("fetched {} image byte(s)", image.len());
    write_output_bytes(output, &image)
}

fn to_json<T: Serialize>(value: &T, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(json)
}
