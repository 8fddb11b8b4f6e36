mod config;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use codespan_reporting::files::SimpleFiles;
use codespan_reporting::term;
use codespan_reporting::term::termcolor::{ColorChoice, StandardStream};
use tracing_subscriber::EnvFilter;

use config::{Config, DEFAULT_CONFIG_FILE};
use processor::{Directive, HttpEgeriaClient, Reporter, process_document};

const SUBCOMMANDS: &[&str] = &["run", "check", "blocks", "help"];

#[derive(Parser)]
#[command(name = "dr-egeria", version, about = "Markdown command processor for Egeria glossaries")]
struct Cli {
    /// Disable colored error output
    #[arg(long, global = true)]
    no_color: bool,

    /// Connection config file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Process a command document against the metadata server
    Run(RunArgs),

    /// Parse and validate a command document without mutating anything
    Check(CheckArgs),

    /// List the command blocks a document contains
    Blocks(BlocksArgs),
}

#[derive(clap::Args)]
struct RunArgs {
    /// Markdown command document
    file: String,

    /// Directive: display, validate or process
    #[arg(short, long, default_value = "display")]
    directive: String,

    /// Write the rewritten document here instead of stdout
    #[arg(short, long)]
    out: Option<PathBuf>,
}

#[derive(clap::Args)]
struct CheckArgs {
    /// Markdown command document
    file: String,
}

#[derive(clap::Args)]
struct BlocksArgs {
    /// Markdown command document
    file: String,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    // Backwards compatibility: if the first positional arg is not a known
    // subcommand, inject "run" so `dr-egeria file.md` works like
    // `dr-egeria run file.md`.
    let mut args: Vec<String> = std::env::args().collect();
    if let Some(first_pos) = args.iter().skip(1).find(|a| !a.starts_with('-')) {
        let first_pos = first_pos.clone();
        if !SUBCOMMANDS.contains(&first_pos.as_str()) {
            let pos = args.iter().position(|a| *a == first_pos).unwrap();
            args.insert(pos, "run".to_string());
        }
    }

    let cli = Cli::parse_from(&args);

    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
    let config = match Config::load(&config_path, cli.config.is_some()) {
        Ok(config) => config,
        Err(message) => {
            eprintln!("error: {}", message);
            process::exit(1);
        }
    };

    match cli.command {
        Command::Run(run_args) => do_run(run_args, config, cli.no_color),
        Command::Check(check_args) => do_check(check_args, config, cli.no_color),
        Command::Blocks(blocks_args) => do_blocks(blocks_args, cli.no_color),
    }
}

fn color_choice(no_color: bool) -> ColorChoice {
    if no_color {
        ColorChoice::Never
    } else {
        ColorChoice::Auto
    }
}

fn read_source(file: &str) -> String {
    match std::fs::read_to_string(file) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: cannot read '{}': {}", file, e);
            process::exit(1);
        }
    }
}

/// Parse the document, emitting parse diagnostics and exiting on failure.
fn parse_document(
    file: &str,
    no_color: bool,
) -> (egeria_md::CommandDocument, SimpleFiles<String, String>) {
    let source = read_source(file);
    let mut files = SimpleFiles::new();
    let file_id = files.add(file.to_string(), source.clone());

    let parser = egeria_md::parser::Parser::new(source, file_id);
    match parser.parse() {
        Ok(document) => (document, files),
        Err(errors) => {
            let writer = StandardStream::stderr(color_choice(no_color));
            let config = term::Config::default();
            for error in &errors {
                let diagnostic = error.to_diagnostic();
                let _ =
                    term::emit_to_write_style(&mut writer.lock(), &config, &files, &diagnostic);
            }
            process::exit(1);
        }
    }
}

fn emit_notes(reporter: &Reporter, files: &SimpleFiles<String, String>, no_color: bool) {
    let writer = StandardStream::stderr(color_choice(no_color));
    let config = term::Config::default();
    for diagnostic in reporter.to_diagnostics() {
        let _ = term::emit_to_write_style(&mut writer.lock(), &config, files, &diagnostic);
    }
}

fn connect(config: &Config) -> HttpEgeriaClient {
    match HttpEgeriaClient::new(&config.platform_url, &config.view_server, &config.user) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("error: cannot build client: {}", e);
            process::exit(1);
        }
    }
}

fn do_run(args: RunArgs, config: Config, no_color: bool) {
    let (document, files) = parse_document(&args.file, no_color);
    let mut reporter = Reporter::new(document.source_id);

    let directive = match Directive::try_parse(&args.directive) {
        Some(directive) => directive,
        None => {
            reporter.warning(format!(
                "unknown directive '{}', defaulting to display",
                args.directive
            ));
            Directive::Display
        }
    };

    let client = connect(&config);
    let mut stdout = std::io::stdout();
    let rewritten =
        match process_document(&client, &document, directive, &mut stdout, &mut reporter) {
            Ok(rewritten) => rewritten,
            Err(e) => {
                eprintln!("error: cannot write output: {}", e);
                process::exit(1);
            }
        };

    emit_notes(&reporter, &files, no_color);

    if directive == Directive::Process {
        match &args.out {
            Some(path) => {
                if let Err(e) = std::fs::write(path, &rewritten) {
                    eprintln!("error: cannot write '{}': {}", path.display(), e);
                    process::exit(1);
                }
                eprintln!("rewritten document written to {}", path.display());
            }
            None => {
                println!("{}", rewritten);
            }
        }
    }

    if reporter.has_errors() {
        process::exit(1);
    }
}

fn do_check(args: CheckArgs, config: Config, no_color: bool) {
    let (document, files) = parse_document(&args.file, no_color);
    let mut reporter = Reporter::new(document.source_id);

    let client = connect(&config);
    let mut sink = std::io::sink();
    if let Err(e) =
        process_document(&client, &document, Directive::Validate, &mut sink, &mut reporter)
    {
        eprintln!("error: cannot write output: {}", e);
        process::exit(1);
    }

    emit_notes(&reporter, &files, no_color);

    if reporter.has_errors() {
        process::exit(1);
    }
    eprintln!("ok: {} validated", args.file);
}

fn do_blocks(args: BlocksArgs, no_color: bool) {
    let (document, _files) = parse_document(&args.file, no_color);
    for block in document.command_blocks() {
        let heading = block.command().unwrap_or("(unnamed)");
        println!("# {} ({} attributes)", heading, block.sections.len());
    }
}
