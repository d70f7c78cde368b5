mod genomes;
mod io;
mod shrink;
mod strings;
mod utils;

use clap::{
    Parser,
    Subcommand,
};
use genomes::GenomesArgs;
use shrink::ShrinkArgs;
use utils::UtilsArgs;
use wild::ArgsOs;

#[derive(Parser, Debug)]
#[command(
    author = env!("CARGO_PKG_AUTHORS"),
    version = env!("CARGO_PKG_VERSION"),
    about = env!("CARGO_PKG_DESCRIPTION"),
    long_about = None,)]
struct Cli {
    #[command(subcommand)]
    command: MainMenu,
}

#[derive(Subcommand, Debug)]
enum MainMenu {
    /// Bin a feature matrix and shrink every bin toward its prior.
    Shrink {
        #[clap(flatten)]
        utils: UtilsArgs,
        #[clap(flatten)]
        args:  ShrinkArgs,
    },

    /// List the built-in genome builds or the chromosome lengths of one.
    Genomes {
        #[clap(flatten)]
        utils: UtilsArgs,
        #[clap(flatten)]
        args:  GenomesArgs,
    },
}

fn main() -> anyhow::Result<()> {
    let args: ArgsOs = wild::args_os();
    let cli = Cli::parse_from(args);

    match cli.command {
        MainMenu::Shrink { utils, args } => {
            utils.setup()?;
            args.run(&utils)?;
        },
        MainMenu::Genomes { utils, args } => {
            utils.setup()?;
            args.run(&utils)?;
        },
    }
    Ok(())
}
