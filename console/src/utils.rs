use clap::{
    ArgAction,
    Args,
};
use compartmap::utils::NUM_THREADS_ENV;
use log::LevelFilter;

use crate::strings::utils as help;

#[derive(Args, Debug, Clone)]
pub(crate) struct UtilsArgs {
    #[arg(
        short = 'T',
        long,
        default_value_t = 0,
        help_heading = "GENERAL",
        help = help::THREADS
    )]
    pub threads: usize,

    #[arg(
        short,
        long,
        action = ArgAction::Count,
        help_heading = "GENERAL",
        help = help::VERBOSE
    )]
    pub verbose: u8,
}

impl UtilsArgs {
    /// Initializes logging and sizes the worker pool. Must run before any
    /// pipeline call touches the pool.
    pub fn setup(&self) -> anyhow::Result<()> {
        if self.threads > 0 {
            std::env::set_var(NUM_THREADS_ENV, self.threads.to_string());
        }
        init_logger(self.verbose)
    }
}

fn init_logger(verbose: u8) -> anyhow::Result<()> {
    let mut builder = pretty_env_logger::formatted_builder();
    match verbose {
        0 => {
            builder.filter_level(LevelFilter::Warn);
            builder.parse_env("RUST_LOG");
        },
        1 => {
            builder.filter_level(LevelFilter::Info);
        },
        2 => {
            builder.filter_level(LevelFilter::Debug);
        },
        _ => {
            builder.filter_level(LevelFilter::Trace);
        },
    }
    builder.try_init()?;
    Ok(())
}
