//! CertForge CLI - one certificate per invocation
//!
//! Commands: fixed, coded, templates, doctor
//! Render commands print `Success: <path>` or `[Error]` lines to stdout
//! Exit codes: 10 bad arguments, 11 missing template, 99 render failure

use clap::error::ErrorKind;
use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use certforge_core::{
    doctor::{Doctor, DoctorContext},
    fonts::{FontConfig, DEFAULT_NAME_FONT, DEFAULT_NUMBER_FONT},
    report::{self, Level, Line},
    templates::{catalog, Policy},
    CertificateRenderer, CertificateRequest, ENGINE_VERSION,
};

const EXIT_USAGE: u8 = 10;

#[derive(Parser)]
#[command(name = "certforge-cli")]
#[command(about = "CertForge CLI - Certificate Renderer", version = ENGINE_VERSION)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Name font file inside the resource directory
    #[arg(long, global = true, default_value = DEFAULT_NAME_FONT)]
    name_font: String,

    /// Certificate number font file inside the resource directory
    #[arg(long, global = true, default_value = DEFAULT_NUMBER_FONT)]
    number_font: String,

    /// Log more to stderr (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Render with a fixed-name template
    ///
    /// NAME CATEGORY CERTIFICATE_NUMBER RANK OUTPUT_PATH RESOURCE_DIR
    Fixed {
        #[arg(value_name = "ARGS", trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },

    /// Render with a coded, session-aware template
    ///
    /// NAME CATEGORY CERTIFICATE_NUMBER RANK SESSION OUTPUT_PATH RESOURCE_DIR
    Coded {
        #[arg(value_name = "ARGS", trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },

    /// List every template filename the resolvers can produce
    Templates {
        /// Mark which templates exist in this directory
        #[arg(short, long)]
        resource_dir: Option<PathBuf>,

        /// Session strings to list coded templates for
        #[arg(short, long)]
        session: Vec<String>,
    },

    /// Check fonts and templates in a resource directory
    Doctor {
        resource_dir: PathBuf,

        /// Session strings whose coded templates must exist
        #[arg(short, long)]
        session: Vec<String>,

        /// Compose a test certificate in memory
        #[arg(long)]
        smoke: bool,
    },
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                print!("{}", e);
                return ExitCode::SUCCESS;
            }
            _ => {
                let message = e.to_string();
                let first = message.lines().next().unwrap_or("invalid arguments");
                println!("{}", Line::new(Level::Error, first.trim_start_matches("error: ")));
                return ExitCode::from(EXIT_USAGE);
            }
        },
    };

    init_logging(cli.verbose);

    let fonts = FontConfig {
        name_font: cli.name_font,
        number_font: cli.number_font,
    };

    match cli.command {
        Commands::Fixed { args } => render(Policy::FixedName, &args, fonts),
        Commands::Coded { args } => render(Policy::CodedSession, &args, fonts),

        Commands::Templates { resource_dir, session } => {
            let entries = catalog(&session, resource_dir.as_deref());
            match serde_json::to_string_pretty(&entries) {
                Ok(json) => {
                    println!("{}", json);
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    println!("{}", Line::new(Level::Error, e.to_string()));
                    ExitCode::FAILURE
                }
            }
        }

        Commands::Doctor { resource_dir, session, smoke } => {
            let ctx = DoctorContext {
                resource_dir: &resource_dir,
                fonts: &fonts,
                sessions: &session,
            };
            let result = Doctor::new(smoke).run(&ctx);
            for line in result.lines() {
                println!("{}", line);
            }
            if result.healthy() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
    }
}

fn render(policy: Policy, args: &[String], fonts: FontConfig) -> ExitCode {
    let renderer = CertificateRenderer::new(fonts);

    let outcome = CertificateRequest::from_args(policy, args).and_then(|request| {
        let resolution = renderer.resolve(&request)?;
        for line in report::notice_lines(&resolution.notices) {
            println!("{}", line);
        }
        renderer.render_resolved(&request, resolution)
    });

    match outcome {
        Ok(rendered) => {
            println!("{}", report::success_line(&rendered));
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "render failed");
            for line in report::failure_lines(&e) {
                println!("{}", line);
            }
            ExitCode::from(e.exit_code())
        }
    }
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
