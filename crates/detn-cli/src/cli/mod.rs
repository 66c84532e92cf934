mod commands;
mod helpers;

use clap::Parser;
use detn_core::DetnError;

pub fn run_from_env() -> i32 {
    helpers::init_logging();

    match run(std::env::args().skip(1)) {
        Ok(code) => code,
        Err(error) => {
            let detn_error = error.as_detn_error();
            eprintln!("{}", detn_error.diagnostic_line());
            if let Some(summary_line) = detn_error.fatal_exit_line() {
                eprintln!("{}", summary_line);
            }
            detn_error.exit_code()
        }
    }
}

pub fn run<I, S>(args: I) -> Result<i32, CliError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let full_args = std::iter::once("detn".to_string())
        .chain(args.into_iter().map(Into::into))
        .collect::<Vec<_>>();

    match Cli::try_parse_from(&full_args) {
        Ok(cli) => dispatch_parsed(cli.command),
        Err(err) => match err.kind() {
            clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion => {
                print!("{}", err);
                Ok(0)
            }
            _ => Err(CliError::Usage(err.to_string())),
        },
    }
}

#[derive(Parser)]
#[command(name = "detn", version, about = "Batched determinants of real square matrices")]
struct Cli {
    #[command(subcommand)]
    command: CliCommand,
}

#[derive(clap::Subcommand)]
enum CliCommand {
    /// Compute one determinant per matrix of an array document
    Compute(commands::ComputeArgs),
    /// Compute determinants and compare them with an expected result document
    Check(commands::CheckArgs),
}

fn dispatch_parsed(command: CliCommand) -> Result<i32, CliError> {
    match command {
        CliCommand::Compute(args) => commands::run_compute_command(args),
        CliCommand::Check(args) => commands::run_check_command(args),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("{0}")]
    Usage(String),
    #[error("{0}")]
    Compute(DetnError),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl CliError {
    fn as_detn_error(&self) -> DetnError {
        match self {
            Self::Usage(message) => DetnError::input_validation("INPUT.CLI_USAGE", message.clone()),
            Self::Compute(error) => error.clone(),
            Self::Internal(error) => DetnError::io_system("IO.CLI", format!("{error:#}")),
        }
    }
}
