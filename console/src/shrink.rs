use std::fs::File;
use std::path::{
    Path,
    PathBuf,
};
use std::time::Instant;

use anyhow::{
    anyhow,
    Context,
};
use clap::Args;
use compartmap::prelude::*;
use log::{
    info,
    warn,
};

use crate::io::{
    open_sink,
    read_sample_set,
    write_bed,
    write_shrunken,
    TableOptions,
};
use crate::strings::shrink as help;
use crate::utils::UtilsArgs;

#[derive(Args, Debug, Clone)]
pub(crate) struct ShrinkArgs {
    #[arg(value_parser, required = true, help = help::INPUT)]
    input:     PathBuf,
    #[arg(short, long, help = help::REFERENCE)]
    reference: Option<PathBuf>,
    #[arg(short, long, required = true, help = help::OUTPUT)]
    output:    PathBuf,
    #[arg(long, help = help::BED)]
    bed:       Option<PathBuf>,
    #[arg(short, long, help = help::CONFIG)]
    config:    Option<PathBuf>,

    #[arg(
        short,
        long,
        value_enum,
        help_heading = "SHRINKAGE ARGS",
        help = help::ASSAY
    )]
    assay:      Option<AssayKind>,
    #[arg(short, long, help_heading = "SHRINKAGE ARGS", help = help::GENOME)]
    genome:     Option<String>,
    #[arg(short = 'R', long, help_heading = "SHRINKAGE ARGS", help = help::RESOLUTION)]
    resolution: Option<i64>,
    #[arg(
        short,
        long,
        num_args = 1..,
        value_delimiter = ',',
        help_heading = "SHRINKAGE ARGS",
        help = help::TARGETS
    )]
    targets:    Vec<String>,
    #[arg(long, value_enum, help_heading = "SHRINKAGE ARGS", help = help::SCALE)]
    scale:      Option<ValueScale>,

    #[arg(long, help_heading = "GENOME ARGS", help = help::CHROM_SIZES)]
    chrom_sizes: Option<PathBuf>,
    #[arg(
        long,
        num_args = 1..,
        value_delimiter = ',',
        help_heading = "GENOME ARGS",
        help = help::CHR
    )]
    chr:         Vec<String>,

    #[arg(long, default_value_t = false, help_heading = "OUTPUT ARGS", help = help::COEFFICIENTS)]
    coefficients: bool,
    #[arg(long, default_value_t = false, help_heading = "OUTPUT ARGS", help = help::BETA_OUTPUT)]
    beta_output:  bool,
    #[arg(long, default_value_t = false, help_heading = "OUTPUT ARGS", help = help::KEEP_GOING)]
    keep_going:   bool,
}

impl ShrinkArgs {
    /// Configuration file values overridden by the options given on the
    /// command line.
    fn shrink_config(&self) -> anyhow::Result<ShrinkConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let file = File::open(path)
                    .with_context(|| format!("Could not open {}", path.display()))?;
                ShrinkConfig::from_json_reader(file)?
            },
            None => ShrinkConfig::default(),
        };
        if let Some(assay) = self.assay {
            config = config.with_assay(assay);
        }
        if let Some(genome) = &self.genome {
            config = config.with_genome(genome.clone());
        }
        if let Some(resolution) = self.resolution {
            config = config.with_resolution(resolution);
        }
        if !self.targets.is_empty() {
            config = config.with_targets(Some(self.targets.clone()));
        }
        if let Some(scale) = self.scale {
            config = config.with_input_scale(scale);
        }
        Ok(config)
    }

    pub fn run(
        &self,
        utils: &UtilsArgs,
    ) -> anyhow::Result<()> {
        let start = Instant::now();
        let config = self.shrink_config()?;
        if self.beta_output && config.input_scale != ValueScale::Beta {
            warn!("--beta-output applies the inverse logit to values that were not beta input");
        }

        let samples = read_sample_set(&self.input)?;
        let reference = self.reference.as_ref().map(read_sample_set).transpose()?;

        let custom_table;
        let genome_table: &GenomeTable = match &self.chrom_sizes {
            Some(path) => {
                custom_table = load_genome_table(path, &config.genome)?;
                &custom_table
            },
            None => &GENOME_TABLES,
        };

        let shrinker = Shrinker::try_new(&samples, reference.as_ref(), config)?;
        info!("Using {} worker threads", compartmap::utils::n_threads());
        let per_chr = if self.chr.is_empty() {
            shrinker.shrink_genome(genome_table)
        }
        else {
            self.chr
                .iter()
                .map(|chr| {
                    (
                        SeqName::from(chr.as_str()),
                        shrinker.shrink_chromosome(genome_table, chr),
                    )
                })
                .collect()
        };

        let mut results = Vec::with_capacity(per_chr.len());
        for (chr, result) in per_chr {
            match result {
                Ok(bins) => results.push(bins),
                Err(e) if self.keep_going => warn!("Skipping {chr}: {e}"),
                Err(e) => return Err(anyhow!(e).context(format!("Failed to process {chr}"))),
            }
        }

        let options = TableOptions {
            coefficients: self.coefficients,
            value_fn:     if self.beta_output {
                fexpit as fn(ValueType) -> ValueType
            }
            else {
                std::convert::identity
            },
        };
        write_shrunken(open_sink(&self.output)?, &results, options)
            .with_context(|| format!("Failed to write {}", self.output.display()))?;
        if let Some(bed) = &self.bed {
            write_bed(open_sink(bed)?, &results)
                .with_context(|| format!("Failed to write {}", bed.display()))?;
        }

        info!(
            "Wrote {} bins from {} chromosomes in {:.2?} (verbosity {})",
            results.iter().map(ShrunkenBins::n_bins).sum::<usize>(),
            results.len(),
            start.elapsed(),
            utils.verbose
        );
        Ok(())
    }
}

/// Built-in builds plus the lengths at `path`, registered as `genome`.
fn load_genome_table(
    path: &Path,
    genome: &str,
) -> anyhow::Result<GenomeTable> {
    let file = File::open(path).with_context(|| format!("Could not open {}", path.display()))?;
    let sizes = match path.extension().and_then(|ext| ext.to_str()) {
        Some("fai") => ChromSizes::from_fai(file)?,
        _ => ChromSizes::from_chrom_sizes(file)?,
    };
    info!(
        "Loaded {} chromosome lengths for {genome} from {}",
        sizes.len(),
        path.display()
    );
    let mut table = GenomeTable::builtin();
    table.insert_build(genome, sizes);
    Ok(table)
}
