use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use fieldwalk::config::{Config, OutputFormat};
use fieldwalk::file::loader::{load_file, load_from_stdin, Format};
use fieldwalk::path::{Context, Path};
use fieldwalk::validation::Schema;
use fieldwalk::value::Value;

/// fieldwalk - Resolve and validate field paths in JSON/YAML documents
#[derive(Parser)]
#[command(name = "fieldwalk")]
#[command(version)]
#[command(about = "Resolve and validate field paths in JSON/YAML documents", long_about = None)]
struct Cli {
    /// Input document format (overrides config)
    #[arg(short, long, global = true, value_enum)]
    format: Option<Format>,

    /// Output format (overrides config)
    #[arg(short, long, global = true, value_enum)]
    output: Option<OutputFormat>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Parse field paths and print their canonical form
    Check {
        #[arg(required = true)]
        paths: Vec<String>,
    },
    /// Print every observation a field path produces
    Query {
        /// Field path, e.g. `users[].email`
        path: String,
        /// Document to read (omit to read stdin)
        file: Option<PathBuf>,
        /// Also print not-found observations
        #[arg(short, long)]
        all: bool,
    },
    /// Validate a document against a TOML schema
    Validate {
        #[arg(short, long)]
        schema: PathBuf,
        /// Document to read (omit to read stdin)
        file: Option<PathBuf>,
    },
}

fn main() -> Result<ExitCode> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let config = Config::load();

    // Command line overrides config
    let input_format = cli.format.unwrap_or(config.input_format);
    let output = cli.output.unwrap_or(config.output_format);

    match cli.command {
        Command::Check { paths } => Ok(run_check(&paths)),
        Command::Query { path, file, all } => {
            let path = Path::parse(&path).with_context(|| format!("Invalid field path '{}'", path))?;
            let document = load_document(file.as_deref(), input_format)?;
            let matched = run_query(
                &path,
                &document,
                all || config.show_missing,
                output,
                &mut io::stdout().lock(),
            )?;
            Ok(if matched {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Command::Validate { schema, file } => {
            let validator = Schema::load(&schema)?.to_validator()?;
            let document = load_document(file.as_deref(), input_format)?;
            let violations = validator.validate(&document);

            for violation in &violations {
                match output {
                    OutputFormat::Text => println!("{}", violation),
                    OutputFormat::Json => println!("{}", serde_json::to_string(violation)?),
                }
            }

            if violations.is_empty() {
                Ok(ExitCode::SUCCESS)
            } else {
                eprintln!("{} violation(s)", violations.len());
                Ok(ExitCode::FAILURE)
            }
        }
    }
}

fn load_document(file: Option<&std::path::Path>, format: Format) -> Result<Value> {
    match file {
        Some(file) => load_file(file, format),
        None => load_from_stdin(format),
    }
}

fn run_check(paths: &[String]) -> ExitCode {
    let mut failed = false;
    for text in paths {
        match Path::parse(text) {
            Ok(path) => println!(
                "{}\tdepth={}\tarray={}",
                path,
                path.depth(),
                path.has_array()
            ),
            Err(err) => {
                eprintln!("{:?}: {}", text, err);
                failed = true;
            }
        }
    }

    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn run_query<W: Write>(
    path: &Path,
    document: &Value,
    show_missing: bool,
    output: OutputFormat,
    out: &mut W,
) -> Result<bool> {
    let mut found = 0usize;
    let mut failure: Option<anyhow::Error> = None;

    path.walk(document, |context| {
        if context.is_found() {
            found += 1;
        } else if !show_missing {
            return;
        }
        if failure.is_some() {
            return;
        }
        let written = render(&context, output)
            .and_then(|line| writeln!(out, "{}", line).map_err(anyhow::Error::from));
        if let Err(err) = written {
            failure = Some(err);
        }
    });

    if let Some(err) = failure {
        return Err(err);
    }

    Ok(found > 0)
}

fn render(context: &Context<'_>, output: OutputFormat) -> Result<String> {
    match output {
        OutputFormat::Text => {
            let value = context
                .value
                .map(Value::to_string)
                .unwrap_or_else(|| "-".to_string());
            Ok(format!("{}\t{}\t{}", context.path, context.outcome, value))
        }
        OutputFormat::Json => Ok(serde_json::to_string(context)?),
    }
}
