use crate::error::{ExpectoError, Result};
use crate::types::Partition;
use phf::phf_set;
use polars::prelude::*;

/// Annotation column holding the chromosome name of each row
pub const SEQNAMES_COLUMN: &str = "seqnames";

/// Chromosome whose rows form the test set
pub const TEST_CHROMOSOME: &str = "chr8";

/// Chromosomes never used for training: the sex chromosomes and the test chromosome
static EXCLUDED_FROM_TRAIN: phf::Set<&'static str> = phf_set! {
    "chrX",
    "chrY",
    "chr8",
};

/// Splits rows into train and test masks by chromosome name.
///
/// A row is a training row unless its chromosome is `chrX`, `chrY` or `chr8`, and
/// a test row exactly when its chromosome is `chr8`. Comparison is plain string
/// equality, so labels like `"chr8 "` or `"Chr8"` count as ordinary chromosomes.
///
/// # Arguments
/// * `seqnames` - One chromosome name per row, in canonical row order
///
/// # Returns
/// * `Partition` - Two masks of the same length as `seqnames`
pub fn partition_by_chromosome<S: AsRef<str>>(seqnames: &[S]) -> Partition {
    let (train, test) = seqnames
        .iter()
        .map(|name| {
            let name = name.as_ref();
            (!EXCLUDED_FROM_TRAIN.contains(name), name == TEST_CHROMOSOME)
        })
        .unzip();

    Partition { train, test }
}

/// Builds the chromosome partition straight from an annotation DataFrame.
///
/// Missing chromosome names are treated as empty strings and therefore land in the
/// training set.
///
/// # Errors
/// * Returns `ExpectoError::MissingColumn` if the table has no `seqnames` column
/// * Returns `ExpectoError::Polars` if the column cannot be read as strings
pub fn partition_annotation(annotation: &DataFrame) -> Result<Partition> {
    let column = annotation
        .column(SEQNAMES_COLUMN)
        .map_err(|_| ExpectoError::MissingColumn(SEQNAMES_COLUMN.into()))?
        .cast(&DataType::String)?;

    let seqnames: Vec<&str> = column
        .str()?
        .into_iter()
        .map(|name| name.unwrap_or(""))
        .collect();

    Ok(partition_by_chromosome(&seqnames))
}

/// Returns the positions of the selected rows, in row order
pub fn selected_rows(mask: &[bool]) -> Vec<usize> {
    mask.iter()
        .enumerate()
        .filter_map(|(idx, &keep)| keep.then_some(idx))
        .collect()
}
