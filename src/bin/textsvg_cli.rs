//! TextSVG CLI - render seed-colored text avatars
//!
//! Commands: render, validate, seed-color
//! SVG or JSON goes to stdout, diagnostics to stderr
//! Returns 2 on invalid input, 1 on I/O or parse failure

use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::Level;

use textsvg_core::{
    color_from_seed, pick_text_color, Color, RenderConfig, RenderError, RenderInput,
    RenderPipeline, RenderRequest,
};

#[derive(Parser)]
#[command(name = "textsvg-cli", version)]
#[command(about = "TextSVG CLI - deterministic text avatars")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Render text to SVG
    Render {
        /// Text to display
        text: String,

        #[command(flatten)]
        options: RenderOptions,

        /// Print a JSON manifest instead of bare SVG
        #[arg(long)]
        manifest: bool,
    },

    /// Validate text and configuration without rendering
    Validate {
        /// Text to display
        text: String,

        #[command(flatten)]
        options: RenderOptions,
    },

    /// Print the background derived from a seed
    SeedColor {
        seed: String,
    },
}

#[derive(Args)]
struct RenderOptions {
    /// Seed for the background color (defaults to the text)
    #[arg(short, long)]
    seed: Option<String>,

    /// JSON config file (RenderConfig)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Canvas size in px
    #[arg(long, allow_negative_numbers = true)]
    size: Option<i64>,

    /// Background color, #rrggbb or hsl(H, S%, L%)
    #[arg(long)]
    background: Option<String>,

    /// Text color, #rrggbb
    #[arg(long)]
    text_color: Option<String>,

    /// Shrink the font to fit instead of using a fixed size
    #[arg(long)]
    adaptive: bool,

    /// Disable the drop shadow
    #[arg(long)]
    no_shadow: bool,
}

impl RenderOptions {
    fn into_request(self, text: String) -> Result<RenderRequest, RenderError> {
        let mut config = match &self.config {
            Some(path) => RenderConfig::load(path)?,
            None => RenderConfig::default(),
        };
        if let Some(size) = self.size {
            config.size = size;
        }
        if self.background.is_some() {
            config.background_color = self.background;
        }
        if self.text_color.is_some() {
            config.text_color = self.text_color;
        }
        if self.adaptive {
            config.fixed_font = false;
        }
        if self.no_shadow {
            config.use_shadow = false;
        }
        Ok(RenderRequest {
            text,
            seed: self.seed,
            config,
        })
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn print_json(value: &impl Serialize) -> ExitCode {
    match serde_json::to_string_pretty(value) {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Failed to serialize output: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn exit_for(err: &RenderError) -> ExitCode {
    if err.is_invalid_input() {
        ExitCode::from(2)
    } else {
        ExitCode::FAILURE
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let pipeline = RenderPipeline::new();

    match cli.command {
        Commands::Render { text, options, manifest } => {
            let request = match options.into_request(text) {
                Ok(r) => r,
                Err(e) => {
                    eprintln!("Failed to load config: {}", e);
                    return ExitCode::FAILURE;
                }
            };

            if manifest {
                return match pipeline.render_asset(&request) {
                    Ok(asset) => print_json(&asset),
                    Err(e) => {
                        eprintln!("{}", e);
                        exit_for(&e)
                    }
                };
            }

            match pipeline.render(&request.as_input()) {
                Ok(rendered) => {
                    println!("{}", rendered.svg);
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    eprintln!("{}", e);
                    exit_for(&e)
                }
            }
        }

        Commands::Validate { text, options } => {
            let request = match options.into_request(text) {
                Ok(r) => r,
                Err(e) => {
                    eprintln!("Failed to load config: {}", e);
                    return ExitCode::FAILURE;
                }
            };
            let input: RenderInput<'_> = request.as_input();

            match pipeline.validate(&input) {
                Ok(_) => print_json(&serde_json::json!({ "valid": true })),
                Err(e) => {
                    let output = serde_json::json!({
                        "valid": false,
                        "field": e.field(),
                        "error": e.to_string(),
                    });
                    print_json(&output);
                    exit_for(&e)
                }
            }
        }

        Commands::SeedColor { seed } => match color_from_seed(&seed) {
            Ok(hsl) => {
                let background = Color::Hsl(hsl);
                print_json(&serde_json::json!({
                    "seed": seed,
                    "background": background.to_string(),
                    "text_color": pick_text_color(background, true).to_string(),
                }))
            }
            Err(e) => {
                eprintln!("{}", e);
                exit_for(&e)
            }
        },
    }
}
