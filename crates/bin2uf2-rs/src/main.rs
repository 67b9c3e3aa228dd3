use bin2uf2_core::{boards::BoardIter, family::Family, Uf2Config};
use clap::{Args, Parser, Subcommand, ValueEnum};
use env_logger::Env;
use log::*;

use std::{io::Write, path::PathBuf};

use crate::{convert::convert, info::info};

mod convert;
mod error;
mod info;
mod reporter;

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the layout of an existing UF2 file
    #[command(arg_required_else_help = true)]
    Info {
        /// Input UF2 file
        input: PathBuf,
    },
}

#[derive(Args, Debug)]
struct ConvertArgs {
    /// Input binary file
    #[clap(required = true)]
    input: Option<PathBuf>,

    /// Output UF2 file
    #[clap(required = true)]
    output: Option<PathBuf>,

    /// Board preset supplying the default family and base address (rp2040, rp2350)
    #[clap(short, long, value_parser = board_parser, default_value = "rp2040")]
    board: String,

    /// Family short name or numeric id, overrides the board's family
    #[clap(short, long, value_parser = family_parser)]
    family: Option<u32>,

    /// Address of the first block, overrides the board's flash start
    #[clap(short = 'a', long, value_parser = parse_u32)]
    base_address: Option<u32>,
}

fn board_parser(s: &str) -> Result<String, String> {
    if let Some(board) = BoardIter::find_by_name(s) {
        Ok(board.board_name().to_string())
    } else {
        Err(format!("Unknown board '{}'", s))
    }
}

fn family_parser(s: &str) -> Result<u32, String> {
    if let Some(family) = Family::find_by_name(s) {
        return Ok(family.id());
    }

    parse_u32(s).map_err(|_| format!("Unknown family '{}'", s))
}

fn parse_u32(s: &str) -> Result<u32, String> {
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => s.parse(),
    };

    parsed.map_err(|err| format!("'{}' is not a 32 bit number: {}", s, err))
}

#[derive(Parser, Debug)]
#[clap(version, about, long_about = None, author = "Jonathan Nilsson")]
#[command(
    arg_required_else_help = true,
    args_conflicts_with_subcommands = true,
    subcommand_negates_reqs = true
)]
struct Cli {
    /// Set the logging verbosity
    #[clap(short, long, value_enum, default_value_t = LogLevel::Info)]
    verbose: LogLevel,

    #[clap(subcommand)]
    command: Option<Command>,

    #[clap(flatten)]
    convert: ConvertArgs,
}

#[derive(Copy, Clone, Debug, Default, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
            LogLevel::Off => LevelFilter::Off,
        }
    }
}

impl ConvertArgs {
    fn config(&self) -> Uf2Config {
        let config = BoardIter::find_by_name(&self.board)
            .map(|board| board.config())
            .unwrap_or_default();

        let config = match self.family {
            Some(family_id) => config.with_family_id(family_id),
            None => config,
        };

        match self.base_address {
            Some(base_addr) => config.with_base_addr(base_addr),
            None => config,
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    env_logger::Builder::from_env(Env::default())
        .filter_level(cli.verbose.into())
        .target(env_logger::Target::Stdout)
        .format(|buf, record| {
            let level = record.level();
            if level == Level::Info {
                writeln!(buf, "{}", record.args())
            } else {
                writeln!(buf, "{}: {}", record.level(), record.args())
            }
        })
        .init();

    if let Some(Command::Info { input }) = cli.command {
        return Ok(info(&input)?);
    }

    let config = cli.convert.config();
    match (&cli.convert.input, &cli.convert.output) {
        (Some(input), Some(output)) => Ok(convert(input, output, &config)?),
        _ => Err("Both an input and an output file are required".into()),
    }
}
