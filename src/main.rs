use clap::{Parser, Subcommand};

#[derive(Debug, Clone, Copy)]
enum ResponseMode {
    Json,
    Raw(RawOutputMode),
}

#[derive(Debug, Clone, Copy)]
enum RawOutputMode {
    Text,
}

mod commands;
mod output;
mod tty;

use commands::{presets, sweep};

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = "i18n-sweep")]
#[command(version = VERSION)]
#[command(about = "Rewrite hardcoded UI text into translation lookups")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rewrite every candidate file under a root directory
    Sweep(sweep::SweepArgs),
    /// List built-in presets
    Presets(presets::PresetsArgs),
    /// Show the rule table of a preset or rule file
    Rules(presets::RulesArgs),
}

fn response_mode(command: &Commands) -> ResponseMode {
    match command {
        Commands::Sweep(args) if args.text => ResponseMode::Raw(RawOutputMode::Text),
        _ => ResponseMode::Json,
    }
}

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();

    if let ResponseMode::Raw(RawOutputMode::Text) = response_mode(&cli.command) {
        return match commands::run_text(cli.command) {
            Ok((content, exit_code)) => {
                print!("{}", content);
                std::process::ExitCode::from(exit_code_to_u8(exit_code))
            }
            Err(err) => {
                let exit_code = output::exit_code_for_error(err.code);
                let _ = output::print_result(Err(err));
                std::process::ExitCode::from(exit_code_to_u8(exit_code))
            }
        };
    }

    let (json_result, exit_code) = commands::run_json(cli.command);
    let _ = output::print_result(json_result);

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
