use std::fmt::Display;

use serde::{
    Deserialize,
    Serialize,
};

use crate::data_structs::typedef::{
    PosType,
    SeqName,
};
use crate::error::{
    CompartmapError,
    Result,
};

/// A genomic interval on one sequence. Coordinates are 0-based and
/// half-open: `[start, end)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Contig {
    seqname: SeqName,
    start:   PosType,
    end:     PosType,
}

impl Contig {
    /// Creates a new `Contig`.
    pub fn new(
        seqname: SeqName,
        start: PosType,
        end: PosType,
    ) -> Self {
        assert!(
            start <= end,
            "Start position must be less than or equal to end position"
        );
        Self {
            seqname,
            start,
            end,
        }
    }

    /// Fallible version of [`Contig::new`] for coordinates coming from user
    /// input.
    pub fn try_new(
        seqname: &str,
        start: PosType,
        end: PosType,
    ) -> Result<Self> {
        if start > end {
            return Err(CompartmapError::input(format!(
                "feature {seqname}:{start}-{end} has start after end"
            )));
        }
        Ok(Self {
            seqname: SeqName::from(seqname),
            start,
            end,
        })
    }

    /// Returns the start position.
    pub fn start(&self) -> PosType {
        self.start
    }

    /// Returns the end position.
    pub fn end(&self) -> PosType {
        self.end
    }

    /// Returns the sequence name of the contig.
    pub fn seqname(&self) -> &SeqName {
        &self.seqname
    }

    /// Returns the length of the contig.
    pub fn length(&self) -> PosType {
        self.end - self.start
    }

    /// Checks if position falls into `[start, end)`.
    pub fn contains_pos(
        &self,
        pos: PosType,
    ) -> bool {
        self.start <= pos && pos < self.end
    }

    /// Checks whether two contigs share at least one base.
    pub fn overlaps(
        &self,
        other: &Self,
    ) -> bool {
        self.seqname == other.seqname
            && self.start < other.end
            && other.start < self.end
    }
}

impl Display for Contig {
    #[cfg_attr(coverage_nightly, coverage(off))]
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        write!(f, "{}:{}-{}", self.seqname, self.start, self.end)
    }
}

impl From<Contig> for bio::io::bed::Record {
    /// Converts into a `bio::io::bed::Record`.
    fn from(value: Contig) -> Self {
        let mut record = bio::io::bed::Record::new();
        record.set_chrom(value.seqname.as_str());
        record.set_start(value.start);
        record.set_end(value.end);
        record
    }
}

impl From<&bio::io::bed::Record> for Contig {
    /// Converts from a `bio::io::bed::Record`.
    fn from(value: &bio::io::bed::Record) -> Self {
        Self::new(SeqName::from(value.chrom()), value.start(), value.end())
    }
}
