use std::io::{
    stdout,
    Write,
};

use anyhow::anyhow;
use clap::Args;
use compartmap::prelude::*;

use crate::strings::genomes as help;
use crate::utils::UtilsArgs;

#[derive(Args, Debug, Clone)]
pub(crate) struct GenomesArgs {
    #[arg(help = help::GENOME)]
    genome: Option<String>,
}

impl GenomesArgs {
    pub fn run(
        &self,
        _utils: &UtilsArgs,
    ) -> anyhow::Result<()> {
        let mut out = stdout().lock();
        match &self.genome {
            None => {
                for build in GENOME_TABLES.builds() {
                    writeln!(out, "{build}")?;
                }
            },
            Some(genome) => {
                let sizes = GENOME_TABLES.get(genome).ok_or_else(|| {
                    anyhow!(
                        "Unknown genome build {genome}. Known builds: {}",
                        GENOME_TABLES.builds().join(", ")
                    )
                })?;
                for chr in sizes.chromosomes() {
                    if let Some(length) = sizes.get(chr.as_str()) {
                        writeln!(out, "{chr}\t{length}")?;
                    }
                }
            },
        }
        Ok(())
    }
}
