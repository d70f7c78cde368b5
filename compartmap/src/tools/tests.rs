use assert_approx_eq::assert_approx_eq;
use itertools::Itertools;
use ndarray::{
    array,
    Array1,
    Array2,
};
use rand::rngs::StdRng;
use rand::{
    Rng,
    SeedableRng,
};
use rstest::{
    fixture,
    rstest,
};

use super::*;
use crate::data_structs::coords::Contig;
use crate::data_structs::{
    AssayKind,
    SampleSet,
};
use crate::error::CompartmapError;
use crate::genome::{
    ChromSizes,
    GenomeTable,
};

fn feature(
    chr: &str,
    start: u64,
) -> Contig {
    Contig::new(chr.into(), start, start + 1)
}

fn names(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

#[fixture]
fn toy_genome() -> GenomeTable {
    let mut table = GenomeTable::new();
    table.insert_build(
        "toy",
        ChromSizes::from_iter([("chr1", 5_000_000), ("chr2", 2_000_000)]),
    );
    table
}

mod binning_tests {
    use super::*;

    #[rstest]
    fn test_groups_by_window(toy_genome: GenomeTable) {
        let binner = GenomicBinner::try_new(1_000_000).unwrap();
        let features = vec![
            feature("chr1", 500),
            feature("chr1", 600_000),
            feature("chr1", 1_500_000),
        ];
        let bins = binner
            .bin_features(&toy_genome, "toy", "chr1", &features)
            .unwrap();

        assert_eq!(bins.len(), 2);
        assert_eq!(bins[0].contig(), &Contig::new("chr1".into(), 0, 1_000_000));
        assert_eq!(bins[0].features(), &[0, 1]);
        assert_eq!(
            bins[1].contig(),
            &Contig::new("chr1".into(), 1_000_000, 2_000_000)
        );
        assert_eq!(bins[1].features(), &[2]);
    }

    #[rstest]
    fn test_unsorted_features(toy_genome: GenomeTable) {
        let binner = GenomicBinner::try_new(1_000_000).unwrap();
        let features = vec![
            feature("chr1", 3_200_000),
            feature("chr1", 10),
            feature("chr1", 3_100_000),
            feature("chr1", 20),
        ];
        let bins = binner
            .bin_features(&toy_genome, "toy", "chr1", &features)
            .unwrap();

        let starts = bins.iter().map(|b| b.contig().start()).collect_vec();
        assert_eq!(starts, vec![0, 3_000_000]);
        assert_eq!(bins[0].features(), &[1, 3]);
        assert_eq!(bins[1].features(), &[0, 2]);
    }

    #[rstest]
    fn test_last_window_is_full_width(toy_genome: GenomeTable) {
        let binner = GenomicBinner::try_new(1_500_000).unwrap();
        let bins = binner
            .bin_features(&toy_genome, "toy", "chr2", &[feature("chr2", 1_900_000)])
            .unwrap();

        assert_eq!(bins.len(), 1);
        assert_eq!(
            bins[0].contig(),
            &Contig::new("chr2".into(), 1_500_000, 3_000_000)
        );
        assert_eq!(binner.n_tiles(2_000_000), 2);
    }

    #[rstest]
    fn test_no_features(toy_genome: GenomeTable) {
        let binner = GenomicBinner::default();
        let bins = binner.bin_features(&toy_genome, "toy", "chr1", &[]).unwrap();
        assert!(bins.is_empty());
        assert_eq!(binner.resolution(), DEFAULT_RESOLUTION);
    }

    #[rstest]
    #[case::unknown_chr("toy", "chr7")]
    #[case::unknown_build("hg1", "chr1")]
    fn test_invalid_chromosome(
        toy_genome: GenomeTable,
        #[case] genome: &str,
        #[case] chr: &str,
    ) {
        let binner = GenomicBinner::default();
        let res = binner.bin_features(&toy_genome, genome, chr, &[feature(chr, 1)]);
        assert!(matches!(
            res,
            Err(CompartmapError::InvalidChromosome { .. })
        ));
    }

    #[rstest]
    #[case(0)]
    #[case(-1_000)]
    fn test_invalid_resolution(#[case] resolution: i64) {
        assert_eq!(
            GenomicBinner::try_new(resolution),
            Err(CompartmapError::InvalidResolution(resolution))
        );
    }

    #[rstest]
    #[case::past_end(feature("chr2", 2_000_000))]
    #[case::other_chromosome(feature("chr1", 100))]
    fn test_invalid_feature(
        toy_genome: GenomeTable,
        #[case] bad: Contig,
    ) {
        let binner = GenomicBinner::default();
        let res = binner.bin_features(
            &toy_genome,
            "toy",
            "chr2",
            &[feature("chr2", 5), bad],
        );
        assert!(matches!(res, Err(CompartmapError::InputType(_))));
    }

    #[rstest]
    fn test_random_features_cover_exactly_once(toy_genome: GenomeTable) {
        let mut rng = StdRng::seed_from_u64(42);

        for resolution in [1_000, 250_000, 1_000_000, 3_000_000] {
            let binner = GenomicBinner::try_new(resolution).unwrap();
            let features = (0..300)
                .map(|_| feature("chr1", rng.gen_range(0..5_000_000)))
                .collect_vec();
            let bins = binner
                .bin_features(&toy_genome, "toy", "chr1", &features)
                .unwrap();

            for bin in bins.iter() {
                assert_eq!(bin.contig().length(), resolution as u64);
                assert_eq!(bin.contig().start() % resolution as u64, 0);
                assert!(bin.n_features() > 0);
                for &idx in bin.features() {
                    assert!(bin.contig().contains_pos(features[idx].start()));
                }
            }
            for (a, b) in bins.iter().tuple_windows() {
                assert!(a.contig().end() <= b.contig().start());
            }

            let mut members = bins.iter().flat_map(|b| b.features().to_vec()).collect_vec();
            members.sort_unstable();
            assert_eq!(members, (0..features.len()).collect_vec());
        }
    }
}

mod summary_tests {
    use super::*;

    #[rstest]
    #[case::median_even(AssayKind::Array, vec![0.1, 0.2], 0.15)]
    #[case::median_odd(AssayKind::Array, vec![3.0, 1.0, 2.0], 2.0)]
    #[case::median_four(AssayKind::Array, vec![4.0, 1.0, 3.0, 2.0], 2.5)]
    #[case::mean(AssayKind::Bisulfite, vec![0.2, 0.4, 0.9], 0.5)]
    #[case::atac_single(AssayKind::Atac, vec![9.0], 3.0)]
    #[case::atac_pair(AssayKind::Atac, vec![4.0, 16.0], 10f64.sqrt() * 2.0)]
    fn test_summary_fn(
        #[case] assay: AssayKind,
        #[case] values: Vec<f64>,
        #[case] expected: f64,
    ) {
        assert_approx_eq!(assay.summarize(&values), expected, 1e-12);
    }

    #[test]
    fn test_atac_scales_with_occupancy() {
        let one = AssayKind::Atac.summarize(&[4.0]);
        let four = AssayKind::Atac.summarize(&[4.0; 4]);
        assert_approx_eq!(four, one * 4.0);
    }

    #[rstest]
    fn test_summarize_bins(toy_genome: GenomeTable) {
        let features = vec![
            feature("chr1", 10),
            feature("chr1", 20),
            feature("chr1", 1_000_010),
        ];
        let bins = GenomicBinner::default()
            .bin_features(&toy_genome, "toy", "chr1", &features)
            .unwrap();
        let values = array![[0.1, 1.0], [0.3, 2.0], [0.5, 3.0]];
        let prior = array![0.55, 1.15, 1.75];

        let summary =
            summarize_bins(AssayKind::Bisulfite, &bins, values.view(), prior.view()).unwrap();

        assert_eq!(summary.values.dim(), (2, 2));
        assert_approx_eq!(summary.values[[0, 0]], 0.2);
        assert_approx_eq!(summary.values[[0, 1]], 1.5);
        assert_approx_eq!(summary.values[[1, 0]], 0.5);
        assert_approx_eq!(summary.values[[1, 1]], 3.0);
        assert_approx_eq!(summary.prior[0], 0.85);
        assert_approx_eq!(summary.prior[1], 1.75);
    }

    #[test]
    fn test_empty_bin() {
        let bins = vec![GenomicBin::new(
            Contig::new("chr1".into(), 0, 10),
            Vec::new(),
        )];
        let values = Array2::<f64>::zeros((0, 2));
        let prior = Array1::<f64>::zeros(0);
        let res = summarize_bins(AssayKind::Array, &bins, values.view(), prior.view());
        assert!(matches!(
            res,
            Err(CompartmapError::InternalConsistency(_))
        ));
    }

    #[test]
    fn test_non_finite_summary() {
        let bins = vec![GenomicBin::new(
            Contig::new("chr1".into(), 0, 10),
            vec![0, 1],
        )];
        let values = array![[-4.0], [-8.0]];
        let prior = array![1.0, 1.0];
        let res = summarize_bins(AssayKind::Atac, &bins, values.view(), prior.view());
        assert!(matches!(
            res,
            Err(CompartmapError::InternalConsistency(_))
        ));
    }

    #[rstest]
    #[case::prior_too_long(vec![0], array![[1.0]], array![1.0, 2.0])]
    #[case::feature_past_end(vec![5], array![[1.0]], array![1.0])]
    #[case::one_feature_past_end(vec![0, 1, 2], array![[1.0], [2.0]], array![1.0, 2.0])]
    fn test_misaligned_inputs(
        #[case] features: Vec<usize>,
        #[case] values: Array2<f64>,
        #[case] prior: Array1<f64>,
    ) {
        let bins = vec![GenomicBin::new(
            Contig::new("chr1".into(), 0, 10),
            features,
        )];
        let res = summarize_bins(AssayKind::Array, &bins, values.view(), prior.view());
        assert!(matches!(res, Err(CompartmapError::InputType(_))));
    }
}

mod global_mean_tests {
    use super::*;

    #[fixture]
    fn reference() -> SampleSet {
        SampleSet::try_new(
            vec![feature("chr1", 10), feature("chr1", 20)],
            names(&["A", "B", "C"]),
            array![[1.0, 2.0, 6.0], [0.0, 4.0, 8.0]],
        )
        .unwrap()
    }

    #[rstest]
    fn test_group_mean(reference: SampleSet) {
        let means = global_means(&reference, None).unwrap();
        assert_approx_eq!(means[0], 3.0);
        assert_approx_eq!(means[1], 4.0);
    }

    #[rstest]
    fn test_empty_targets_is_group_mean(reference: SampleSet) {
        let empty: Vec<String> = Vec::new();
        let means = global_means(&reference, Some(&empty)).unwrap();
        assert_eq!(means, global_means(&reference, None).unwrap());
    }

    #[rstest]
    fn test_target_mean(reference: SampleSet) {
        let targets = names(&["A", "B"]);
        let means = global_means(&reference, Some(&targets)).unwrap();
        assert_approx_eq!(means[0], 1.5);
        assert_approx_eq!(means[1], 2.0);
    }

    #[rstest]
    fn test_single_target(reference: SampleSet) {
        let targets = names(&["A"]);
        assert_eq!(
            global_means(&reference, Some(&targets)),
            Err(CompartmapError::InsufficientTargets("A".to_string()))
        );
    }

    #[rstest]
    #[case::unknown(names(&["A", "Z"]))]
    #[case::duplicated(names(&["A", "B", "A"]))]
    fn test_bad_targets(
        reference: SampleSet,
        #[case] targets: Vec<String>,
    ) {
        assert!(matches!(
            global_means(&reference, Some(&targets)),
            Err(CompartmapError::InputType(_))
        ));
    }

    #[test]
    fn test_resolve_targets() {
        assert_eq!(resolve_targets(None), Ok(None));
        let targets = names(&["A", "B"]);
        assert_eq!(resolve_targets(Some(&targets)), Ok(Some(targets.as_slice())));
    }
}

mod shrinkage_tests {
    use super::*;

    #[test]
    fn test_coefficient_is_sample_sd() {
        let x = array![0.0, 1.0, 2.0];
        assert_approx_eq!(shrinkage_coefficient(x.view(), None).unwrap(), 1.0);

        let x = array![2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_approx_eq!(
            shrinkage_coefficient(x.view(), None).unwrap(),
            (32.0f64 / 7.0).sqrt()
        );
    }

    #[test]
    fn test_coefficient_over_targets() {
        let x = array![0.0, 100.0, 2.0];
        assert_approx_eq!(
            shrinkage_coefficient(x.view(), Some(&[0, 2])).unwrap(),
            2f64.sqrt()
        );
    }

    #[test]
    fn test_unit_coefficient_is_identity() {
        let x = array![0.0, 1.0, 2.0];
        let shrunk = shrink_values(x.view(), 5.0, 1.0);
        assert_eq!(shrunk, x);
    }

    #[test]
    fn test_zero_coefficient_collapses() {
        let x = array![0.5, 0.5, 0.5];
        let shrunk = shrink_values(x.view(), 0.3, 0.0);
        assert_eq!(shrunk, array![0.3, 0.3, 0.3]);
    }

    #[test]
    fn test_partial_shrinkage() {
        let x = array![1.0, 3.0];
        let shrunk = shrink_values(x.view(), 2.0, 0.5);
        assert_approx_eq!(shrunk[0], 1.5);
        assert_approx_eq!(shrunk[1], 2.5);
    }

    #[test]
    fn test_matrix_per_bin_coefficients() {
        let summaries = array![[0.0, 1.0, 2.0], [0.5, 0.5, 0.5]];
        let prior = array![5.0, 0.3];
        let res = shrink_matrix(summaries.view(), prior.view(), None).unwrap();

        assert_eq!(res.coefficients[0], 1.0);
        assert_eq!(res.coefficients[1], 0.0);
        assert_eq!(res.values.row(0), summaries.row(0));
        assert_eq!(res.values.row(1), array![0.3, 0.3, 0.3]);
    }

    #[test]
    fn test_non_targets_are_shrunk() {
        let summaries = array![[0.0, 2.0, 10.0]];
        let prior = array![1.0];
        let res = shrink_matrix(summaries.view(), prior.view(), Some(&[0, 1])).unwrap();

        let c = 2f64.sqrt();
        assert_approx_eq!(res.coefficients[0], c);
        assert_approx_eq!(res.values[[0, 0]], 1.0 - c);
        assert_approx_eq!(res.values[[0, 1]], 1.0 + c);
        assert_approx_eq!(res.values[[0, 2]], 1.0 + 9.0 * c);
    }

    #[rstest]
    #[case::prior_too_long(array![[1.0, 2.0]], array![0.5, 0.5], None)]
    #[case::prior_too_short(array![[1.0, 2.0], [3.0, 4.0]], array![0.5], None)]
    #[case::target_past_end(array![[1.0, 2.0]], array![0.5], Some(vec![0, 2]))]
    fn test_matrix_rejects_misaligned_inputs(
        #[case] summaries: Array2<f64>,
        #[case] prior: Array1<f64>,
        #[case] targets: Option<Vec<usize>>,
    ) {
        let res = shrink_matrix(summaries.view(), prior.view(), targets.as_deref());
        assert!(matches!(res, Err(CompartmapError::InputType(_))));
    }

    #[rstest]
    #[case::just_past_end(vec![0, 3])]
    #[case::far_past_end(vec![100])]
    fn test_coefficient_rejects_target_out_of_range(#[case] targets: Vec<usize>) {
        let x = array![0.0, 1.0, 2.0];
        let res = shrinkage_coefficient(x.view(), Some(&targets));
        assert!(matches!(res, Err(CompartmapError::InputType(_))));
    }
}

mod filter_tests {
    use super::*;

    fn rows(prior: Array1<f64>) -> BinRows {
        let n = prior.len();
        BinRows {
            bins: (0..n as u64)
                .map(|i| {
                    GenomicBin::new(
                        Contig::new("chr1".into(), i * 10, i * 10 + 10),
                        vec![i as usize],
                    )
                })
                .collect(),
            values: Array2::from_shape_fn((n, 2), |(i, j)| (i * 10 + j) as f64),
            coefficients: Array1::from_shape_fn(n, |i| i as f64 / 10.0),
            prior,
        }
    }

    #[test]
    fn test_drops_zero_prior_in_lockstep() {
        let filtered = filter_zero_prior(rows(array![1.0, 0.0, 2.0, -0.0])).unwrap();

        assert_eq!(filtered.len(), 2);
        assert_eq!(filtered.prior, array![1.0, 2.0]);
        assert_eq!(filtered.values, array![[0.0, 1.0], [20.0, 21.0]]);
        assert_eq!(filtered.coefficients, array![0.0, 0.2]);
        let starts = filtered.bins.iter().map(|b| b.contig().start()).collect_vec();
        assert_eq!(starts, vec![0, 20]);
    }

    #[test]
    fn test_keeps_nonzero_rows() {
        let input = rows(array![0.1, -0.5, 1e-300]);
        let filtered = filter_zero_prior(input.clone()).unwrap();
        assert_eq!(filtered.len(), 3);
        assert_eq!(filtered.values, input.values);
    }

    #[test]
    fn test_all_zero() {
        let filtered = filter_zero_prior(rows(array![0.0, 0.0])).unwrap();
        assert!(filtered.is_empty());
        assert_eq!(filtered.values.dim(), (0, 2));
    }

    #[rstest]
    #[case::short_prior(|r: &mut BinRows| r.prior = array![1.0])]
    #[case::extra_value_row(|r: &mut BinRows| r.values = Array2::zeros((4, 2)))]
    #[case::short_coefficients(|r: &mut BinRows| r.coefficients = array![0.1, 0.2])]
    fn test_rejects_misaligned_rows(#[case] misalign: fn(&mut BinRows)) {
        let mut input = rows(array![1.0, 0.0, 2.0]);
        misalign(&mut input);
        let res = filter_zero_prior(input);
        assert!(matches!(res, Err(CompartmapError::InputType(_))));
    }
}
