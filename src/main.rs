use clap::{Parser, Subcommand};

use commands::GlobalArgs;

mod commands;
mod output;
mod tty;

use commands::{config, matching, output as output_cmd, resolve, scene, version};

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = "compnamer")]
#[command(version = VERSION)]
#[command(about = "Match save locations against naming templates and generate file names")]
struct Cli {
    /// Explicit config file (default: ~/.config/compnamer/compnamer.json)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Match a location against comp templates and extract tokens
    Match(matching::MatchArgs),
    /// Generate a composition script name
    Scene(scene::SceneArgs),
    /// Generate a render output path
    Output(output_cmd::OutputArgs),
    /// Compute the next unused version in a directory
    Version(version::VersionArgs),
    /// Resolve a location to a versioned scene name and its output names
    Resolve(resolve::ResolveArgs),
    /// Show compnamer configuration
    Config(config::ConfigArgs),
}

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();

    let global = GlobalArgs { config: cli.config };

    let (json_result, exit_code) = commands::run_json(cli.command, &global);
    let _ = output::print_json_result(json_result);

    std::process::ExitCode::from(exit_code_to_u8(exit_code))
}

fn exit_code_to_u8(code: i32) -> u8 {
    if code <= 0 {
        0
    } else if code >= 255 {
        255
    } else {
        code as u8
    }
}
