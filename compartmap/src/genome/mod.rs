//! Chromosome length tables keyed by genome build.
//!
//! The binner only needs `length_of(build, chromosome)`; this is the
//! [`ChromLengths`] trait. [`GenomeTable`] is the stock implementation. It
//! holds the built-in `hg19`, `hg38` and `mm10` assemblies and can be extended
//! with tables read from a FASTA index (`.fai`) or a `chrom.sizes` file.
//!
//! The built-in tables are exposed through the process-wide, read-only
//! [`GENOME_TABLES`] static, loaded once on first access.

mod builtin;


use std::io::{
    BufReader,
    Read,
};

use anyhow::Context as AnyhowContext;
use hashbrown::HashMap;
use log::debug;
use once_cell::sync::Lazy;

use crate::data_structs::typedef::{
    PosType,
    SeqName,
};

/// Built-in genome tables.
pub static GENOME_TABLES: Lazy<GenomeTable> = Lazy::new(GenomeTable::builtin);

/// Lookup of chromosome lengths.
pub trait ChromLengths {
    /// Length in bases of `chr` in `genome`, or `None` when either is
    /// unknown.
    fn length_of(
        &self,
        genome: &str,
        chr: &str,
    ) -> Option<PosType>;
}

/// Chromosome lengths of a single assembly, in file order.
#[derive(Debug, Clone, Default)]
pub struct ChromSizes {
    order:   Vec<SeqName>,
    lengths: HashMap<String, PosType>,
}

impl ChromSizes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a chromosome.
    pub fn insert(
        &mut self,
        chr: &str,
        length: PosType,
    ) {
        if self.lengths.insert(chr.to_string(), length).is_none() {
            self.order.push(SeqName::from(chr));
        }
    }

    pub fn get(
        &self,
        chr: &str,
    ) -> Option<PosType> {
        self.lengths.get(chr).copied()
    }

    /// Chromosome names in insertion order.
    pub fn chromosomes(&self) -> &[SeqName] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Reads chromosome lengths from a FASTA index (`.fai`).
    pub fn from_fai<R: Read>(reader: R) -> anyhow::Result<Self> {
        let records: Vec<noodles_fasta::fai::Record> =
            noodles_fasta::fai::io::Reader::new(BufReader::new(reader))
                .read_index()
                .context("Failed to read FASTA index")?
                .into();
        let mut sizes = Self::new();
        for record in records {
            sizes.insert(&String::from_utf8_lossy(record.name()), record.length());
        }
        debug!("Read {} chromosomes from FASTA index", sizes.len());
        Ok(sizes)
    }

    /// Reads a headerless, tab-separated `chrom.sizes` file
    /// (`<name>\t<length>` per line).
    pub fn from_chrom_sizes<R: Read>(reader: R) -> anyhow::Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(false)
            .comment(Some(b'#'))
            .from_reader(reader);
        let mut sizes = Self::new();
        for (line, record) in csv_reader.deserialize::<(String, PosType)>().enumerate() {
            let (chr, length) =
                record.with_context(|| format!("Malformed chrom.sizes line {}", line + 1))?;
            sizes.insert(&chr, length);
        }
        debug!("Read {} chromosomes from chrom.sizes", sizes.len());
        Ok(sizes)
    }
}

impl<S: AsRef<str>> FromIterator<(S, PosType)> for ChromSizes {
    fn from_iter<T: IntoIterator<Item = (S, PosType)>>(iter: T) -> Self {
        let mut sizes = Self::new();
        for (chr, length) in iter {
            sizes.insert(chr.as_ref(), length);
        }
        sizes
    }
}

/// Chromosome length tables for several genome builds.
#[derive(Debug, Clone, Default)]
pub struct GenomeTable {
    builds: HashMap<String, ChromSizes>,
}

impl GenomeTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Table with the built-in assemblies (`hg19`, `hg38`, `mm10`).
    pub fn builtin() -> Self {
        let mut table = Self::new();
        table.insert_build("hg19", builtin::HG19.iter().copied().collect());
        table.insert_build("hg38", builtin::HG38.iter().copied().collect());
        table.insert_build("mm10", builtin::MM10.iter().copied().collect());
        table
    }

    /// Adds or replaces a genome build.
    pub fn insert_build(
        &mut self,
        genome: &str,
        sizes: ChromSizes,
    ) {
        self.builds.insert(genome.to_string(), sizes);
    }

    pub fn get(
        &self,
        genome: &str,
    ) -> Option<&ChromSizes> {
        self.builds.get(genome)
    }

    /// Names of the known genome builds, sorted.
    pub fn builds(&self) -> Vec<&str> {
        let mut builds = self.builds.keys().map(String::as_str).collect::<Vec<_>>();
        builds.sort_unstable();
        builds
    }
}

impl ChromLengths for GenomeTable {
    fn length_of(
        &self,
        genome: &str,
        chr: &str,
    ) -> Option<PosType> {
        self.builds.get(genome).and_then(|sizes| sizes.get(chr))
    }
}

impl<T: ChromLengths + ?Sized> ChromLengths for &T {
    fn length_of(
        &self,
        genome: &str,
        chr: &str,
    ) -> Option<PosType> {
        (**self).length_of(genome, chr)
    }
}
