//! `xlate` command line: translate a Java `main` program into C or Python.

use clap::{Parser, Subcommand};
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use xlate::{Target, TranslateConfig, Transpiler};

#[derive(Parser)]
#[command(name = "xlate", version, about = "Translate Java programs into C or Python")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Translate a Java source file
    Translate {
        /// Java source file, or `-` for stdin
        input: PathBuf,

        /// Target language: c, python
        #[arg(short, long)]
        to: Target,

        /// Output file (stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print the full result as JSON
        #[arg(long)]
        json: bool,

        /// Config file (defaults to global and .xlate/config.toml)
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// List available target languages
    Targets,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let code = match cli.command {
        Command::Translate {
            input,
            to,
            output,
            json,
            config,
        } => run_translate(&input, to, output.as_deref(), json, config.as_deref()),
        Command::Targets => run_targets(),
    };
    std::process::exit(code);
}

fn run_translate(
    input: &Path,
    target: Target,
    output: Option<&Path>,
    json: bool,
    config: Option<&Path>,
) -> i32 {
    let config = match config {
        Some(path) => match TranslateConfig::load_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("{e}");
                return 1;
            }
        },
        None => {
            let root = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
            TranslateConfig::load(&root)
        }
    };

    let source = match read_source(input) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("Failed to read {}: {}", input.display(), e);
            return 1;
        }
    };

    let result = Transpiler::with_config(config).translate(&source, target);
    let text = if json {
        match serde_json::to_string_pretty(&result) {
            Ok(mut text) => {
                text.push('\n');
                text
            }
            Err(e) => {
                eprintln!("Failed to encode result: {e}");
                return 1;
            }
        }
    } else {
        result.code.clone()
    };

    if let Some(path) = output {
        if let Err(e) = std::fs::write(path, &text) {
            eprintln!("Failed to write {}: {}", path.display(), e);
            return 1;
        }
        eprintln!("Generated {}", path.display());
    } else {
        print!("{text}");
    }

    if let Some(error) = &result.error {
        eprintln!("error: {error}");
    }
    if result.success { 0 } else { 1 }
}

fn read_source(input: &Path) -> std::io::Result<String> {
    if input.as_os_str() == "-" {
        let mut source = String::new();
        std::io::stdin().read_to_string(&mut source)?;
        Ok(source)
    } else {
        std::fs::read_to_string(input)
    }
}

fn run_targets() -> i32 {
    for generator in xlate::generators() {
        let target = generator.target();
        println!("{}\t.{}", target, target.extension());
    }
    0
}
