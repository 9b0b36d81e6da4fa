use std::io::{self, Read};
use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser as ClapParser, Subcommand};
use formula_kit::cli::{
    self, CliError, CompleteOptions, EvalOptions, HighlightOptions, load_schema,
};
use formula_kit::highlight::Language;
use serde::Serialize;

#[derive(ClapParser)]
#[command(name = "fkit")]
#[command(about = "Highlight, complete and preview expression, query and DML snippets")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate an expression and print the typed result
    Eval {
        /// The expression to evaluate
        expression: String,

        /// JSON object with record, old, user, now and extra bindings
        #[arg(short, long)]
        context: Option<String>,

        /// JSON file holding an array of function descriptors
        #[arg(short, long)]
        functions: Option<PathBuf>,

        /// Time budget in milliseconds
        #[arg(short, long, default_value_t = 1000)]
        timeout: u64,

        /// Pretty-print the output
        #[arg(short, long)]
        pretty: bool,
    },

    /// Print highlight spans for each line of a snippet
    Highlight {
        /// Language of the snippet: cel, soql or dml
        #[arg(short, long)]
        lang: Language,

        /// Snippet text (reads from stdin if not provided)
        #[arg(short, long)]
        input: Option<String>,

        /// Pretty-print the output
        #[arg(short, long)]
        pretty: bool,
    },

    /// Print completion candidates at a cursor position
    Complete {
        /// Language of the snippet: cel, soql or dml
        #[arg(short, long)]
        lang: Language,

        /// Byte offset of the cursor (defaults to the end of the input)
        #[arg(short, long)]
        cursor: Option<usize>,

        /// Treat the request as explicitly triggered
        #[arg(short, long)]
        explicit: bool,

        /// JSON file holding the schema snapshot
        #[arg(short, long)]
        schema: Option<PathBuf>,

        /// Snippet text (reads from stdin if not provided)
        #[arg(short, long)]
        input: Option<String>,

        /// Pretty-print the output
        #[arg(short, long)]
        pretty: bool,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Eval {
            expression,
            context,
            functions,
            timeout,
            pretty,
        } => run_eval(expression, context, functions, timeout, pretty),
        Commands::Highlight {
            lang,
            input,
            pretty,
        } => run_highlight(lang, input, pretty),
        Commands::Complete {
            lang,
            cursor,
            explicit,
            schema,
            input,
            pretty,
        } => run_complete(lang, cursor, explicit, schema, input, pretty),
    };

    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn run_eval(
    expression: String,
    context: Option<String>,
    functions: Option<PathBuf>,
    timeout: u64,
    pretty: bool,
) -> Result<(), CliError> {
    let functions = match functions {
        Some(path) => Some(
            std::fs::read_to_string(&path).map_err(|source| CliError::File { path, source })?,
        ),
        None => None,
    };

    let options = EvalOptions {
        expression,
        context,
        functions,
        timeout: Duration::from_millis(timeout),
    };
    let result = cli::execute_eval(&options)?;
    print_json(&result, pretty)?;

    if !result.is_success() {
        std::process::exit(2);
    }
    Ok(())
}

fn run_highlight(lang: Language, input: Option<String>, pretty: bool) -> Result<(), CliError> {
    let options = HighlightOptions {
        language: lang,
        input: read_input(input)?,
    };
    let lines = cli::execute_highlight(&options)?;
    print_json(&lines, pretty)
}

fn run_complete(
    lang: Language,
    cursor: Option<usize>,
    explicit: bool,
    schema: Option<PathBuf>,
    input: Option<String>,
    pretty: bool,
) -> Result<(), CliError> {
    let options = CompleteOptions {
        language: lang,
        input: read_input(input)?,
        cursor,
        explicit,
        schema: load_schema(schema.as_ref())?,
    };
    let result = cli::execute_complete(&options)?;
    print_json(&result, pretty)
}

/// The `--input` text, or stdin when it is piped.
fn read_input(input: Option<String>) -> Result<String, CliError> {
    match input {
        Some(s) => Ok(s),
        None if !atty::is(atty::Stream::Stdin) => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Ok(buffer)
        }
        None => Err(CliError::NoInput),
    }
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<(), CliError> {
    let json = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }?;
    println!("{}", json);
    Ok(())
}
