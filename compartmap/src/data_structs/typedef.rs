use smallstr::SmallString;

pub const SMALLSTR_SIZE: usize = 20;
/// Chromosome / sequence name.
pub type SeqName = SmallString<[u8; SMALLSTR_SIZE]>;
/// 0-based genomic coordinate.
pub type PosType = u64;
pub type ValueType = f64;
