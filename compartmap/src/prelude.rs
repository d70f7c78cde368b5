pub use crate::data_structs::coords::Contig;
pub use crate::data_structs::typedef::{
    PosType,
    SeqName,
    ValueType,
};
pub use crate::data_structs::{
    AssayKind,
    ReferenceSet,
    SampleSet,
    ValueScale,
};
pub use crate::error::{
    CompartmapError,
    Result as CompartmapResult,
};
pub use crate::genome::{
    ChromLengths,
    ChromSizes,
    GenomeTable,
    GENOME_TABLES,
};
pub use crate::tools::{
    filter_zero_prior,
    global_means,
    shrink_bins,
    shrink_matrix,
    summarize_bins,
    GenomicBin,
    GenomicBinner,
    ShrinkConfig,
    Shrinker,
    ShrunkenBins,
};
pub use crate::utils::{
    fexpit,
    flogit,
};
