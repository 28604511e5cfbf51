use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::Parser;
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use camlex::render::Renderer;
use camlex::scanner;
use camlex::shell;

#[derive(Parser, Debug)]
#[command(
    name = "camlex",
    version,
    about = "Tokenize a small subset of OCaml"
)]
struct Cli {
    /// OCaml source file to tokenize (omit for the interactive menu)
    file: Option<PathBuf>,

    /// Token listing format
    #[arg(long, default_value = "text", value_parser = ["text", "json"], env = "CAMLEX_FORMAT")]
    format: String,

    /// Only show the first N tokens
    #[arg(long, value_name = "N")]
    limit: Option<usize>,

    /// Fail with diagnostics if the source contains unrecognized characters
    #[arg(long)]
    check: bool,

    /// Disable colored output
    #[arg(long, env = "CAMLEX_NO_COLOR")]
    no_color: bool,

    /// Enable debug logging
    #[arg(short, long, env = "CAMLEX_VERBOSE")]
    verbose: bool,
}

fn init_logging(verbose: bool, no_color: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        }
    });

    let layer = fmt::layer()
        .with_writer(io::stderr)
        .with_ansi(!no_color)
        .with_target(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .try_init()
        .context("initialize logging")
}

fn read_source(path: &Path) -> Result<String> {
    std::fs::read_to_string(path)
        .with_context(|| format!("read source file '{}'", path.display()))
}

fn tokenize_file(cli: &Cli, path: &Path, renderer: &Renderer) -> Result<()> {
    let source = read_source(path)?;
    let name = path.display().to_string();
    debug!(file = %name, bytes = source.len(), "tokenizing");

    if cli.check {
        if let Err(errors) = scanner::scan(&source) {
            let count = errors.len();
            for e in errors {
                let e = e.with_source_code(name.as_str(), source.as_str());
                eprint!("{}", renderer.render_diagnostic(&e));
            }
            bail!("{count} unrecognized character(s) in '{name}'");
        }
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let written = match cli.format.as_str() {
        "json" => renderer.write_json(&mut out, scanner::tokenize(&source))?,
        _ => renderer
            .write_listing(&mut out, scanner::tokenize(&source))
            .context("write token listing")?,
    };
    out.flush().context("flush stdout")?;
    debug!(tokens = written, "done");
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.no_color)?;

    let renderer = Renderer::new(!cli.no_color).with_limit(cli.limit);

    match &cli.file {
        Some(path) => tokenize_file(&cli, path, &renderer),
        None => shell::run_shell(renderer).context("interactive shell"),
    }
}
