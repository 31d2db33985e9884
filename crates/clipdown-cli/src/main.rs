// Command-line interface for clipdown
//
// Stands in for the surface that triggers a "copy selection as Markdown"
// command: it reads the selected markup as HTML, converts it, and writes the
// Markdown (or the JSON response a messaging layer would carry) to stdout or
// a file.
//
// Usage:
//  clipdown [<input>] [--output <file>] [--config <file>] [--json]
//  cat selection.html | clipdown --link-style inlined

mod settings;

use clap::{Parser, ValueEnum};
use clipdown::{ClipdownError, ClipdownService, ConvertRequest, Fragment};
use settings::Loader;
use std::error::Error;
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LinkStyleArg {
    Passthrough,
    Inlined,
}

impl LinkStyleArg {
    fn as_config_value(self) -> &'static str {
        match self {
            LinkStyleArg::Passthrough => "passthrough",
            LinkStyleArg::Inlined => "inlined",
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "clipdown", version, about = "Convert a selected HTML fragment to Markdown")]
struct Cli {
    /// Input HTML file ("-" or omitted reads stdin)
    input: Option<PathBuf>,

    /// Write the result to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Path to a clipdown.toml configuration file
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// How anchor elements are rendered
    #[arg(long, value_enum)]
    link_style: Option<LinkStyleArg>,

    /// Bullet used for unordered list items
    #[arg(long, value_name = "CHAR")]
    bullet: Option<char>,

    /// Conversion request as JSON, e.g. {"message":"copy-as-markdown"}
    #[arg(long, value_name = "JSON", default_value = r#"{"message":"copy-as-markdown"}"#)]
    request: String,

    /// Print the response as JSON ({"markdown": ...})
    #[arg(long)]
    json: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn run(cli: &Cli) -> Result<(), Box<dyn Error>> {
    let mut loader = Loader::new();
    if let Some(path) = &cli.config {
        loader = loader.with_file(path);
    }
    if let Some(style) = cli.link_style {
        loader = loader.set_override("markdown.link_style", style.as_config_value())?;
    }
    if let Some(bullet) = cli.bullet {
        loader = loader.set_override("markdown.bullet_list_marker", bullet.to_string())?;
    }
    let settings = loader.build()?;
    log::debug!("options: {:?}", settings.markdown);

    let request = ConvertRequest::from_json(&cli.request)?;
    let html = read_input(cli.input.as_ref())?;
    // blank input stands for a collapsed selection
    let selection: Option<Fragment> =
        (!html.trim().is_empty()).then(|| clipdown::parse_html(&html));

    let service = ClipdownService::with_options(settings.markdown);
    let response = service.handle_request(&request, selection.as_ref());

    let rendered = if cli.json {
        format!("{}\n", response.to_json()?)
    } else if response.markdown.is_empty() {
        String::new()
    } else {
        format!("{}\n", response.markdown)
    };

    match &cli.output {
        Some(path) => fs::write(path, rendered)?,
        None => print!("{}", rendered),
    }
    Ok(())
}

fn read_input(path: Option<&PathBuf>) -> Result<String, Box<dyn Error>> {
    let bytes = match path {
        Some(path) if path.as_os_str() != "-" => fs::read(path)?,
        _ => {
            let mut buf = Vec::new();
            io::stdin().read_to_end(&mut buf)?;
            buf
        }
    };
    String::from_utf8(bytes)
        .map_err(|e| ClipdownError::InvalidInput(format!("input is not UTF-8: {}", e)).into())
}
