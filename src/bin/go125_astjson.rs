// src/bin/go125_astjson.rs
use std::process::ExitCode;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use go125_astjson::{
    json_to_source, read_input, reprint, source_to_json, write_output, Options,
};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Converts Go source to JSON and back.
#[derive(Debug, Parser)]
#[command(name = "go125-astjson", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Parse Go source and write its syntax tree as JSON
    #[command(name = "go2json")]
    Go2json(Flags),
    /// Read a JSON syntax tree and print it as Go source
    #[command(name = "json2go")]
    Json2go(Flags),
    /// Parse Go source and print it again, without JSON in between
    Loop(Flags),
}

#[derive(Debug, Args)]
struct Flags {
    /// Input file; empty or "-" reads stdin
    #[arg(long, default_value = "")]
    input: String,
    /// Output file; empty writes stdout
    #[arg(long, default_value = "")]
    output: String,
    /// Spaces per JSON indentation level; 0 writes compact JSON
    #[arg(long, default_value_t = 0)]
    indent: usize,
    /// Keep comments
    #[arg(long)]
    comments: bool,
    /// Record source positions
    #[arg(long)]
    positions: bool,
    /// Emit RefIds and restore shared nodes from them
    #[arg(long)]
    references: bool,
    /// Emit the file's import list
    #[arg(long)]
    imports: bool,
}

impl Flags {
    fn options(&self) -> Options {
        Options::new()
            .with_comments(self.comments)
            .with_positions(self.positions)
            .with_references(self.references)
            .with_imports(self.imports)
            .with_indent(self.indent)
    }

    /// Name the parser reports in diagnostics and positions.
    fn filename(&self) -> &str {
        match self.input.as_str() {
            "" | "-" => "<stdin>",
            path => path,
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

impl Command {
    fn flags(&self) -> &Flags {
        match self {
            Command::Go2json(f) | Command::Json2go(f) | Command::Loop(f) => f,
        }
    }

    fn convert(&self, input: &str) -> anyhow::Result<String> {
        match self {
            Command::Go2json(f) => source_to_json(input, f.filename(), &f.options())
                .context("converting Go to JSON"),
            Command::Json2go(f) => {
                json_to_source(input, &f.options()).context("converting JSON to Go")
            }
            Command::Loop(f) => {
                reprint(input, f.filename(), f.comments).context("reprinting Go source")
            }
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let flags = cli.command.flags();
    debug!(?flags, "running");

    let input = read_input(&flags.input)
        .with_context(|| format!("reading input {:?}", flags.filename()))?;
    let output = cli.command.convert(&input)?;
    write_output(&flags.output, &output)
        .with_context(|| format!("writing output {:?}", flags.output))?;
    Ok(())
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if !e.use_stderr() => e.exit(),
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };
    init_tracing();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
