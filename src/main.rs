//! wpenv CLI entry point.

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use wpenv::{
    Bootstrap, CommandBootstrap, ConfigResolver, DefaultEnvSource, DocsConfig, EmptyValue,
    ResolvedConfig, ResolverOptions, SettingsSchema, WordPressConfig, generate_docs,
};

#[derive(Parser)]
#[command(name = "wpenv")]
#[command(about = "Resolve WordPress container settings from the environment")]
#[command(version)]
struct Cli {
    /// Prefix for every environment variable name (e.g. BLOG -> BLOG_REDIS_PORT)
    #[arg(long, global = true, env = "WPENV_PREFIX")]
    prefix: Option<String>,

    /// Keep variables set to "" instead of treating them as unset
    #[arg(long, global = true)]
    empty_literal: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the resolved settings
    Print {
        /// Print a JSON object instead of KEY=value lines
        #[arg(long)]
        json: bool,
        /// Print secret values instead of masking them
        #[arg(long)]
        show_secrets: bool,
    },
    /// Print a markdown reference of the environment variables
    Docs {
        /// Also list settings that cannot be changed from the environment
        #[arg(long)]
        include_fixed: bool,
    },
    /// Resolve the settings and hand off to the bootstrap program
    Boot {
        /// Program to run, without arguments, with the settings in its environment
        program: PathBuf,
        /// Working directory for the program
        #[arg(long)]
        workdir: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("wpenv: {err}");
            ExitCode::from(u8::try_from(err.exit_code()).unwrap_or(1))
        }
    }
}

fn run(cli: Cli) -> wpenv::Result<()> {
    let mut options = ResolverOptions::builder();
    if let Some(prefix) = cli.prefix {
        options = options.with_env_prefix(prefix);
    }
    if cli.empty_literal {
        options = options.empty_values(EmptyValue::Literal);
    }

    // Fails before any hand-off if the table is broken
    let resolver = ConfigResolver::for_schema::<WordPressConfig>(options.build())?;

    match cli.command {
        Commands::Print { json, show_secrets } => {
            let config = resolver.resolve(&DefaultEnvSource);
            print_config(&config, json, show_secrets)
        }
        Commands::Docs { include_fixed } => {
            let mut docs = DocsConfig::new()
                .with_title("WordPress Environment Reference")
                .with_description("Variables read by wpenv when the container starts.");
            if include_fixed {
                docs = docs.include_fixed();
            }
            print!("{}", generate_docs::<WordPressConfig>(docs));
            Ok(())
        }
        Commands::Boot { program, workdir } => {
            let config = resolver.resolve(&DefaultEnvSource);
            // Typed view warns about placeholder keys before anything starts
            WordPressConfig::from_resolved(&config)?;

            let mut bootstrap = CommandBootstrap::new(program);
            if let Some(dir) = workdir {
                bootstrap = bootstrap.workdir(dir);
            }
            bootstrap.boot(&config)
        }
    }
}

fn print_config(config: &ResolvedConfig, json: bool, show_secrets: bool) -> wpenv::Result<()> {
    let rendered = if json {
        let mut rendered = serde_json::to_string_pretty(&config.to_json(show_secrets))?;
        rendered.push('\n');
        rendered
    } else {
        config.to_env_lines(show_secrets)
    };

    let mut out = std::io::stdout().lock();
    out.write_all(rendered.as_bytes())?;
    out.flush()?;
    Ok(())
}
