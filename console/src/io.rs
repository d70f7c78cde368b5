use std::fs::File;
use std::io::{
    stdout,
    BufWriter,
    Read,
    Write,
};
use std::path::Path;

use anyhow::{
    bail,
    Context,
};
use bio::io::bed;
use compartmap::prelude::*;
use itertools::Itertools;
use log::{
    debug,
    info,
};
use ndarray::Array2;

const COORD_COLUMNS: [&str; 3] = ["chr", "start", "end"];

/// Reads a tab-separated `chr start end <sample>...` matrix.
pub(crate) fn read_sample_set<P: AsRef<Path>>(path: P) -> anyhow::Result<SampleSet> {
    let path = path.as_ref();
    let file =
        File::open(path).with_context(|| format!("Could not open {}", path.display()))?;
    let set = parse_sample_set(file)
        .with_context(|| format!("Failed to read feature matrix {}", path.display()))?;
    info!(
        "Read {} features x {} samples from {}",
        set.n_features(),
        set.n_samples(),
        path.display()
    );
    Ok(set)
}

pub(crate) fn parse_sample_set<R: Read>(reader: R) -> anyhow::Result<SampleSet> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .comment(Some(b'#'))
        .from_reader(reader);

    let header = csv_reader.headers()?.clone();
    if header.len() <= COORD_COLUMNS.len() {
        bail!("Header must list `chr start end` followed by at least one sample");
    }
    for (found, expected) in header.iter().zip(COORD_COLUMNS) {
        if !found.eq_ignore_ascii_case(expected) {
            bail!("Expected column `{expected}` in header, found `{found}`");
        }
    }
    let sample_names = header
        .iter()
        .skip(COORD_COLUMNS.len())
        .map(str::to_string)
        .collect_vec();

    let mut features = Vec::new();
    let mut values = Vec::new();
    for (line, record) in csv_reader.records().enumerate() {
        let record = record.with_context(|| format!("Malformed row {}", line + 1))?;
        let start = record[1]
            .parse::<PosType>()
            .with_context(|| format!("Invalid start on row {}", line + 1))?;
        let end = record[2]
            .parse::<PosType>()
            .with_context(|| format!("Invalid end on row {}", line + 1))?;
        features.push(
            Contig::try_new(&record[0], start, end)
                .with_context(|| format!("Invalid coordinates on row {}", line + 1))?,
        );
        for (field, name) in record.iter().skip(COORD_COLUMNS.len()).zip(&sample_names) {
            values.push(field.trim().parse::<ValueType>().with_context(|| {
                format!("Invalid value `{field}` for sample {name} on row {}", line + 1)
            })?);
        }
    }

    let values = Array2::from_shape_vec((features.len(), sample_names.len()), values)?;
    Ok(SampleSet::try_new(features, sample_names, values)?)
}

/// Opens `path` for writing, `-` meaning standard output.
pub(crate) fn open_sink(path: &Path) -> anyhow::Result<Box<dyn Write>> {
    if path.as_os_str() == "-" {
        Ok(Box::new(BufWriter::new(stdout())))
    }
    else {
        let file = File::create(path)
            .with_context(|| format!("Could not create {}", path.display()))?;
        Ok(Box::new(BufWriter::new(file)))
    }
}

/// Output table options.
#[derive(Debug, Clone, Copy)]
pub(crate) struct TableOptions {
    pub coefficients: bool,
    /// Applied to the prior and the shrunken values on output.
    pub value_fn:     fn(ValueType) -> ValueType,
}

impl Default for TableOptions {
    fn default() -> Self {
        Self {
            coefficients: false,
            value_fn:     std::convert::identity,
        }
    }
}

/// Writes `chr start end prior [coefficient] <sample>...`, one row per bin.
pub(crate) fn write_shrunken<W: Write>(
    writer: W,
    results: &[ShrunkenBins],
    options: TableOptions,
) -> anyhow::Result<()> {
    let mut csv_writer = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .from_writer(writer);

    let sample_names = match results.first() {
        Some(first) => first.sample_names().clone(),
        None => Vec::new(),
    };
    let mut header = COORD_COLUMNS.iter().map(|s| s.to_string()).collect_vec();
    header.push("prior".to_string());
    if options.coefficients {
        header.push("coefficient".to_string());
    }
    header.extend(sample_names);
    csv_writer.write_record(&header)?;

    let mut n_rows = 0;
    for result in results {
        for (row, contig) in result.contigs().enumerate() {
            let mut record = vec![
                contig.seqname().to_string(),
                contig.start().to_string(),
                contig.end().to_string(),
                (options.value_fn)(result.prior()[row]).to_string(),
            ];
            if options.coefficients {
                record.push(result.coefficients()[row].to_string());
            }
            record.extend(
                result
                    .values()
                    .row(row)
                    .iter()
                    .map(|&v| (options.value_fn)(v).to_string()),
            );
            csv_writer.write_record(&record)?;
            n_rows += 1;
        }
    }
    csv_writer.flush()?;
    debug!("Wrote {n_rows} bins");
    Ok(())
}

/// Writes the retained bins as BED intervals.
pub(crate) fn write_bed<W: Write>(
    writer: W,
    results: &[ShrunkenBins],
) -> anyhow::Result<()> {
    let mut bed_writer = bed::Writer::new(writer);
    for contig in results.iter().flat_map(|r| r.contigs()) {
        bed_writer
            .write(&bed::Record::from(contig.clone()))
            .context("Failed to write BED record")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use compartmap::prelude::*;

    use super::*;

    const MATRIX: &str = "chr\tstart\tend\tA\tB\n\
                          chr1\t500\t501\t0.1\t0.3\n\
                          chr1\t600000\t600001\t0.2\t0.4\n\
                          # comment\n\
                          chr1\t1500000\t1500001\t0.5\t0.6\n";

    #[test]
    fn test_parse_sample_set() {
        let set = parse_sample_set(MATRIX.as_bytes()).unwrap();
        assert_eq!(set.n_features(), 3);
        assert_eq!(set.sample_names(), &["A".to_string(), "B".to_string()]);
        assert_eq!(set.features()[1].start(), 600_000);
        assert_eq!(set.values()[[2, 1]], 0.6);
    }

    #[test]
    fn test_parse_rejects_bad_header() {
        let bad = "chrom\tpos\tend\tA\nchr1\t1\t2\t0.5\n";
        assert!(parse_sample_set(bad.as_bytes()).is_err());
        let no_samples = "chr\tstart\tend\nchr1\t1\t2\n";
        assert!(parse_sample_set(no_samples.as_bytes()).is_err());
    }

    #[test]
    fn test_parse_rejects_bad_value() {
        let bad = "chr\tstart\tend\tA\nchr1\t1\t2\tNA\n";
        assert!(parse_sample_set(bad.as_bytes()).is_err());
    }

    #[test]
    fn test_read_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(MATRIX.as_bytes()).unwrap();
        let set = read_sample_set(file.path()).unwrap();
        assert_eq!(set.n_samples(), 2);
    }

    #[test]
    fn test_write_outputs() {
        let set = parse_sample_set(MATRIX.as_bytes()).unwrap();
        let config = ShrinkConfig::new(AssayKind::Array, "hg19", 1_000_000);
        let res = shrink_bins(&set, None, "chr1", config, &*GENOME_TABLES).unwrap();
        let results = vec![res];

        let mut table = Vec::new();
        write_shrunken(
            &mut table,
            &results,
            TableOptions {
                coefficients: true,
                ..Default::default()
            },
        )
        .unwrap();
        let table = String::from_utf8(table).unwrap();
        let lines = table.lines().collect::<Vec<_>>();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "chr\tstart\tend\tprior\tcoefficient\tA\tB");
        let first = lines[1].split('\t').collect::<Vec<_>>();
        assert_eq!(&first[..3], &["chr1", "0", "1000000"]);
        let prior = first[3].parse::<f64>().unwrap();
        assert!((prior - 0.25).abs() < 1e-12);

        let mut bed = Vec::new();
        write_bed(&mut bed, &results).unwrap();
        let bed = String::from_utf8(bed).unwrap();
        assert!(bed.starts_with("chr1\t0\t1000000"));
        assert_eq!(bed.lines().count(), 2);
    }
}
