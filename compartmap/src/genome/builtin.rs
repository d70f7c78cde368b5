//! Chromosome lengths of the primary assemblies shipped with the crate.

use crate::data_structs::typedef::PosType;

pub(super) const HG19: &[(&str, PosType)] = &[
    ("chr1", 249_250_621),
    ("chr2", 243_199_373),
    ("chr3", 198_022_430),
    ("chr4", 191_154_276),
    ("chr5", 180_915_260),
    ("chr6", 171_115_067),
    ("chr7", 159_138_663),
    ("chr8", 146_364_022),
    ("chr9", 141_213_431),
    ("chr10", 135_534_747),
    ("chr11", 135_006_516),
    ("chr12", 133_851_895),
    ("chr13", 115_169_878),
    ("chr14", 107_349_540),
    ("chr15", 102_531_392),
    ("chr16", 90_354_753),
    ("chr17", 81_195_210),
    ("chr18", 78_077_248),
    ("chr19", 59_128_983),
    ("chr20", 63_025_520),
    ("chr21", 48_129_895),
    ("chr22", 51_304_566),
    ("chrX", 155_270_560),
    ("chrY", 59_373_566),
];

pub(super) const HG38: &[(&str, PosType)] = &[
    ("chr1", 248_956_422),
    ("chr2", 242_193_529),
    ("chr3", 198_295_559),
    ("chr4", 190_214_555),
    ("chr5", 181_538_259),
    ("chr6", 170_805_979),
    ("chr7", 159_345_973),
    ("chr8", 145_138_636),
    ("chr9", 138_394_717),
    ("chr10", 133_797_422),
    ("chr11", 135_086_622),
    ("chr12", 133_275_309),
    ("chr13", 114_364_328),
    ("chr14", 107_043_718),
    ("chr15", 101_991_189),
    ("chr16", 90_338_345),
    ("chr17", 83_257_441),
    ("chr18", 80_373_285),
    ("chr19", 58_617_616),
    ("chr20", 64_444_167),
    ("chr21", 46_709_983),
    ("chr22", 50_818_468),
    ("chrX", 156_040_895),
    ("chrY", 57_227_415),
];

pub(super) const MM10: &[(&str, PosType)] = &[
    ("chr1", 195_471_971),
    ("chr2", 182_113_224),
    ("chr3", 160_039_680),
    ("chr4", 156_508_116),
    ("chr5", 151_834_684),
    ("chr6", 149_736_546),
    ("chr7", 145_441_459),
    ("chr8", 129_401_213),
    ("chr9", 124_595_110),
    ("chr10", 130_694_993),
    ("chr11", 122_082_543),
    ("chr12", 120_129_022),
    ("chr13", 120_421_639),
    ("chr14", 124_902_244),
    ("chr15", 104_043_685),
    ("chr16", 98_207_768),
    ("chr17", 94_987_271),
    ("chr18", 90_702_639),
    ("chr19", 61_431_566),
    ("chrX", 171_031_299),
    ("chrY", 91_744_698),
];
