use std::ffi::OsString;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use wgrib_shim::{logging, system_call, Binding, HostValue, ShimConfig, Tool};

/// Call the wgrib/wgrib2 entry point from the command line.
#[derive(Debug, Parser)]
#[command(name = "wgrib-shim", version)]
struct Cli {
    /// Config file (default: <config dir>/wgrib-shim/config.toml).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[arg(long, value_enum, global = true)]
    tool: Option<Tool>,

    /// Shared library exporting the entry point.
    #[arg(long, global = true)]
    library: Option<PathBuf>,

    /// Executable used with --isolate.
    #[arg(long, global = true)]
    executable: Option<PathBuf>,

    /// Run the tool in a child process instead of in-process.
    #[arg(long, global = true)]
    isolate: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Call the entry point with VALUES, read per the configured call
    /// style: one command string to split (`command_string`), or one value
    /// per argument (`variadic`).
    Main {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        values: Vec<OsString>,
    },
    /// Forward ARGS unchanged; the first one fills the program slot.
    Run {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<OsString>,
    },
    /// Run COMMAND through the platform shell.
    System { command: String },
    /// Print how COMMAND would be split.
    Split {
        #[arg(long)]
        json: bool,
        command: String,
    },
}

fn main() -> Result<()> {
    let log_file = logging::init_tracing();
    let cli = Cli::parse();
    let config = load_config(&cli)?;
    tracing::debug!(?log_file, call_style = ?config.call_style, "configuration loaded");

    let status = match &cli.command {
        Command::Split { json, command } => {
            let tokens = config.splitter.build()?.split(command)?;
            if *json {
                println!("{}", serde_json::to_string(&tokens)?);
            } else {
                for token in &tokens {
                    println!("{}", token);
                }
            }
            0
        }
        Command::System { command } => system_call(command)?,
        Command::Main { values } => {
            let values: Vec<HostValue> = values.iter().map(host_value).collect();
            open_binding(&config)?.main(&values)?
        }
        Command::Run { args } => {
            let values: Vec<HostValue> = args.iter().map(host_value).collect();
            open_binding(&config)?.run_args(&values)?
        }
    };

    std::process::exit(status);
}

fn load_config(cli: &Cli) -> Result<ShimConfig> {
    let mut config = match &cli.config {
        Some(path) => ShimConfig::load_from(path)?,
        None => ShimConfig::load()?,
    };
    apply_overrides(&mut config, cli);
    config.validate()?;
    Ok(config)
}

fn apply_overrides(config: &mut ShimConfig, cli: &Cli) {
    if let Some(tool) = cli.tool {
        config.tool = tool;
    }
    if let Some(library) = &cli.library {
        config.library = Some(library.clone());
    }
    if let Some(executable) = &cli.executable {
        config.executable = Some(executable.clone());
    }
    if cli.isolate {
        config.isolate = true;
    }
}

fn open_binding(config: &ShimConfig) -> Result<Binding> {
    Binding::from_config(config)
        .with_context(|| format!("failed to open the {} entry point", config.tool.symbol()))
}

#[cfg(unix)]
fn host_value(arg: &OsString) -> HostValue {
    use std::os::unix::ffi::OsStrExt;
    HostValue::Bytes(arg.as_bytes().to_vec())
}

#[cfg(not(unix))]
fn host_value(arg: &OsString) -> HostValue {
    HostValue::Str(arg.to_string_lossy().into_owned())
}
