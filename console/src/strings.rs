macro_rules! define_strings {
    (
        $($name:ident = $value:literal);*$(;)?
    ) => {
        $(
            pub const $name: &str = $value;
        )*
    };
}

pub mod shrink {
    define_strings! {
        INPUT =
            "Tab-separated feature matrix with header `chr start end <sample>...`. \
            Values must be finite; impute missing values beforehand.";
        REFERENCE =
            "Tab-separated reference matrix in the same format and with the same \
            feature rows as the input. The prior is computed from its samples. \
            Defaults to the input itself.";
        OUTPUT =
            "Path of the tab-separated output `chr start end prior <sample>...`. \
            Use `-` for standard output.";
        BED =
            "Also write the coordinates of the retained bins as BED.";
        ASSAY =
            "Assay the values come from. Selects the per-bin summary: square root \
            of the mean times the feature count for ATAC, median for arrays, mean \
            for bisulfite sequencing.";
        GENOME =
            "Genome build the chromosome lengths are taken from (hg19, hg38, mm10), \
            or the name given to a table loaded with --chrom-sizes.";
        RESOLUTION =
            "Bin width in bases.";
        TARGETS =
            "Names of the samples the prior and the shrinkage intensity are \
            computed from. At least two are required. All samples are shrunk \
            regardless.";
        SCALE =
            "Scale of the input. 'raw' takes values as the assay delivers them; \
            'beta' (array only) converts beta values to M-values before binning.";
        CONFIG =
            "JSON file with shrinkage parameters. Command-line options override \
            its values.";
        CHROM_SIZES =
            "Chromosome lengths as a FASTA index (.fai) or a two-column \
            chrom.sizes file. Registered under the --genome name.";
        CHR =
            "Only process these chromosomes.";
        COEFFICIENTS =
            "Add a `coefficient` column with the per-bin shrinkage intensity.";
        BETA_OUTPUT =
            "Convert the prior and shrunken values back to beta values on output.";
        KEEP_GOING =
            "Skip chromosomes that fail instead of aborting the run.";
    }
}

pub mod genomes {
    define_strings! {
        GENOME =
            "Print the chromosome lengths of this build instead of the list of \
            builds.";
    }
}

pub mod utils {
    define_strings! {
        THREADS =
            "Number of worker threads. 0 uses one per CPU.";
        VERBOSE =
            "Increase logging verbosity (-v info, -vv debug, -vvv trace). Without \
            it, RUST_LOG is honored.";
    }
}
