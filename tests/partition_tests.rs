use expecto_rs::partition::{partition_by_chromosome, selected_rows};

#[test]
fn test_holdout_boundary_rows() {
    let partition = partition_by_chromosome(&["chr1", "chrX", "chr8", "chrY", "chr2"]);
    assert_eq!(partition.train, vec![true, false, false, false, true]);
    assert_eq!(partition.test, vec![false, false, true, false, false]);
    assert_eq!(partition.n_train(), 2);
    assert_eq!(partition.n_test(), 1);
}

#[test]
fn test_partition_is_disjoint() {
    let seqnames = [
        "chr1", "chr8", "chrX", "chrY", "chr10", "chr18", "chr8_random", "", "chrM", "chr8",
    ];
    let partition = partition_by_chromosome(&seqnames);
    assert_eq!(partition.len(), seqnames.len());

    for (train, test) in partition.train.iter().zip(&partition.test) {
        assert!(!(train & test));
    }
}

#[test]
fn test_test_rows_are_exactly_chr8() {
    let seqnames = ["chr8", "Chr8", "chr8 ", "8", "chr18", "chr8"];
    let partition = partition_by_chromosome(&seqnames);

    for (name, &test) in seqnames.iter().zip(&partition.test) {
        assert_eq!(test, *name == "chr8");
    }
    // near misses are ordinary training chromosomes
    assert_eq!(partition.train, vec![false, true, true, true, true, false]);
}

#[test]
fn test_empty_annotation() {
    let partition = partition_by_chromosome::<&str>(&[]);
    assert!(partition.is_empty());
    assert_eq!(partition.n_test(), 0);
}

#[test]
fn test_selected_rows_keep_order() {
    assert_eq!(selected_rows(&[false, true, true, false, true]), vec![1, 2, 4]);
    assert!(selected_rows(&[false, false]).is_empty());
}
