//! Podplate CLI - render container deployment configs from one variables file

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

mod commands;
mod config;
mod display;
mod error;
mod exit_codes;
mod logging;

use config::{DEFAULT_CONFIG_FILE, ProjectConfig};
use error::Result;

#[derive(Parser)]
#[command(name = "podplate")]
#[command(version)]
#[command(about = "Render container deployment configs from one variables file", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug output
    #[arg(long, global = true)]
    debug: bool,

    /// Project config file [default: podplate.yaml when present]
    #[arg(long, global = true, env = "PODPLATE_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Render one template with a variables file
    Render {
        /// Variables file [default: from project config]
        #[arg(short = 'f', long = "variables")]
        variables: Option<PathBuf>,

        /// Template to render
        #[arg(short, long)]
        input: PathBuf,

        /// Where to write the rendered file
        #[arg(short, long)]
        output: PathBuf,

        /// Fail if any placeholder is left unresolved
        #[arg(long)]
        strict: bool,
    },

    /// Print the resolved variables
    Values {
        /// Variables file [default: from project config]
        #[arg(short = 'f', long = "variables")]
        variables: Option<PathBuf>,

        /// Output as JSON instead of YAML
        #[arg(long)]
        json: bool,
    },

    /// List the built-in templates
    List,

    /// Print a built-in template
    Show {
        /// Template name, as shown by `list`
        name: String,
    },

    /// Create the project layout and write the built-in templates
    Scaffold {
        /// Project root [default: from project config]
        #[arg(long)]
        root: Option<PathBuf>,

        /// Replace templates that already exist
        #[arg(long)]
        overwrite: bool,
    },

    /// Render every template of the project
    Interpolate {
        /// Project root [default: from project config]
        #[arg(long)]
        root: Option<PathBuf>,

        /// Variables file [default: config/templates/template-envs.yaml under the root]
        #[arg(short = 'f', long = "variables")]
        variables: Option<PathBuf>,

        /// Fail if any placeholder is left unresolved
        #[arg(long)]
        strict: bool,
    },

    /// Base64 encode the data of a rendered <name>-secrets-template.yaml
    EncodeSecrets {
        /// The rendered secrets template
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Write a podplate.yaml with the defaults
    Init {
        /// Replace an existing config
        #[arg(long)]
        overwrite: bool,
    },

    /// Print the effective project config
    Config,
}

fn main() {
    // Setup miette for nice error display
    miette::set_panic_hook();

    let cli = Cli::parse();
    logging::init(cli.debug);

    if let Err(err) = run(cli) {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config;
    let load_config = || -> Result<ProjectConfig> {
        let config = ProjectConfig::load(config_path.as_deref())?;
        tracing::debug!(?config, "project config");
        Ok(config)
    };

    match cli.command {
        Commands::Render {
            variables,
            input,
            output,
            strict,
        } => {
            let config = load_config()?;
            let variables = variables.unwrap_or_else(|| config.variables_in(&config.root));
            commands::render::run(&variables, &input, &output, strict || config.strict)
        }

        Commands::Values { variables, json } => {
            let config = load_config()?;
            let variables = variables.unwrap_or_else(|| config.variables_in(&config.root));
            commands::values::run(&variables, json)
        }

        Commands::List => commands::list::run(),

        Commands::Show { name } => commands::show::run(&name),

        Commands::Scaffold { root, overwrite } => {
            let config = load_config()?;
            commands::scaffold::run(config.root_or(root.as_deref()), overwrite)
        }

        Commands::Interpolate {
            root,
            variables,
            strict,
        } => {
            let config = load_config()?;
            let root = config.root_or(root.as_deref());
            let variables = variables.unwrap_or_else(|| config.variables_in(root));
            commands::interpolate::run(root, &variables, &config.templates, strict || config.strict)
        }

        Commands::EncodeSecrets { file } => commands::encode_secrets::run(&file),

        // Runs without loading the config it is about to write
        Commands::Init { overwrite } => {
            let path = config_path.as_deref().unwrap_or(Path::new(DEFAULT_CONFIG_FILE));
            commands::init::run(path, overwrite)
        }

        Commands::Config => commands::config::run(&load_config()?),
    }
}
