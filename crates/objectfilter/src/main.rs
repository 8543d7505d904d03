//! `objfilter` - CLI for objectfilter
//!
//! This binary filters the keys of JSON documents read from a file or stdin
//! and inspects the configuration and presets that drive it.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::io::{self, Read};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::debug;

use objectfilter::cli::{ApplyCommand, Cli, Command, ConfigCommand};
use objectfilter::{filter_object, init_logging, Config, Error, FilterSpec, Object};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Load configuration
    let config = Config::load_from(cli.config.clone()).context("loading configuration")?;

    // Execute the command
    match cli.command {
        Command::Apply(apply_cmd) => handle_apply(&config, &apply_cmd),
        Command::Config(config_cmd) => handle_config(&config, config_cmd),
        Command::Presets => {
            handle_presets(&config);
            Ok(())
        }
    }
}

fn handle_apply(config: &Config, cmd: &ApplyCommand) -> Result<()> {
    let spec = config.resolve(cmd.preset.as_deref(), cmd.to_spec())?;
    let input = read_input(cmd)?;

    let document: serde_json::Value =
        serde_json::from_str(&input).context("parsing input as JSON")?;

    let output = match document {
        serde_json::Value::Object(_) => {
            let target = Object::try_from(document)
                .map_err(|_| anyhow::anyhow!("input object could not be converted"))?;
            filter_object(&target, &spec).to_json()
        }
        other => {
            debug!("Input is not an object, passing it through");
            other
        }
    };

    let pretty = config.output.pretty && !cmd.compact;
    let rendered = if pretty {
        serde_json::to_string_pretty(&output)?
    } else {
        serde_json::to_string(&output)?
    };
    println!("{rendered}");
    Ok(())
}

fn read_input(cmd: &ApplyCommand) -> Result<String> {
    match cmd.input_path() {
        Some(path) => {
            let text = std::fs::read_to_string(path).map_err(|source| Error::ReadInput {
                path: path.clone(),
                source,
            })?;
            Ok(text)
        }
        None => {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .context("reading stdin")?;
            Ok(text)
        }
    }
}

fn handle_presets(config: &Config) {
    if config.presets.is_empty() {
        println!("No presets configured.");
        return;
    }
    for (name, spec) in &config.presets {
        println!("{name}: {}", describe(spec));
    }
}

fn describe(spec: &FilterSpec) -> String {
    let mut parts = vec![spec
        .filter_type
        .clone()
        .unwrap_or_else(|| "exclude".to_string())];
    if let Some(filters) = &spec.filters {
        parts.push(format!("keys [{}]", filters.iter().collect::<Vec<_>>().join(", ")));
    }
    if let Some(patterns) = &spec.regex_filters {
        parts.push(format!("{} pattern(s)", patterns.iter().count()));
    }
    if spec.recursive == Some(false) {
        parts.push("flat".to_string());
    }
    parts.join(", ")
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Filter]");
                println!("  {}", describe(&config.filter));
                println!(
                    "  Max depth:          {}",
                    config
                        .filter
                        .max_depth
                        .unwrap_or(objectfilter::filter::DEFAULT_MAX_DEPTH)
                );
                println!();
                println!("[Presets]");
                for name in config.presets.keys() {
                    println!("  {name}");
                }
                println!();
                println!("[Output]");
                println!("  Pretty:             {}", config.output.pretty);
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}
