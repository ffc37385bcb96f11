use hilbsparse_core::{BlockedSparseBinaryMatrix, SbmError, SparseBinaryMatrix};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

fn random_sbm(seed: u64, nrow: usize, ncol: usize, nnz: usize) -> SparseBinaryMatrix {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let row: Vec<u32> = (0..nnz).map(|_| rng.random_range(0..nrow as u32)).collect();
    let col: Vec<u32> = (0..nnz).map(|_| rng.random_range(0..ncol as u32)).collect();
    SparseBinaryMatrix::from_parts(nrow, ncol, row, col).unwrap()
}

fn sorted_pairs(pairs: impl Iterator<Item = (u32, u32)>) -> Vec<(u32, u32)> {
    let mut v: Vec<(u32, u32)> = pairs.collect();
    v.sort_unstable();
    v
}

fn assert_partition(a: &SparseBinaryMatrix, b: &BlockedSparseBinaryMatrix) {
    let starts = b.start_rows();
    assert_eq!(starts.len(), b.nblocks() + 1);
    assert_eq!(starts[0], 0);
    assert_eq!(*starts.last().unwrap(), a.nrow());
    assert!(starts.windows(2).all(|w| w[0] < w[1]) || a.nrow() == 0);
    for (k, block) in b.blocks().iter().enumerate() {
        assert_eq!(block.row_range(), starts[k]..starts[k + 1]);
        for &i in block.rows() {
            assert!(block.row_range().contains(&(i as usize)));
        }
    }
    assert_eq!(b.nnz(), a.nnz());
    assert_eq!(
        sorted_pairs(b.blocks().iter().flat_map(|blk| blk.iter())),
        sorted_pairs(a.iter())
    );
}

#[test]
fn boundaries_for_uneven_height() {
    let a = random_sbm(1, 10, 4, 30);
    let b = BlockedSparseBinaryMatrix::new(&a, 4).unwrap();
    assert_eq!(b.nblocks(), 3);
    assert_eq!(b.start_rows(), &[0, 4, 8, 10]);
    assert_eq!(b.blocks()[2].height(), 2);
    assert_eq!(b.block_height(), 4);
    assert_eq!(b.shape(), (10, 4));
    assert_partition(&a, &b);
}

#[test]
fn partition_is_complete_for_many_heights() {
    let a = random_sbm(2, 97, 41, 1500);
    for h in [1, 2, 7, 32, 96, 97, 98, 1000] {
        let b = BlockedSparseBinaryMatrix::new(&a, h).unwrap();
        assert_eq!(b.nblocks(), 97usize.div_ceil(h));
        assert_partition(&a, &b);
    }
}

#[test]
fn blocks_keep_source_order() {
    let a = random_sbm(3, 20, 20, 200);
    let b = BlockedSparseBinaryMatrix::new(&a, 6).unwrap();
    for block in b.blocks() {
        let expected: Vec<(u32, u32)> = a
            .iter()
            .filter(|&(i, _)| block.row_range().contains(&(i as usize)))
            .collect();
        assert_eq!(block.iter().collect::<Vec<_>>(), expected);
    }
    let rebuilt = b.to_sparse();
    assert_eq!(rebuilt.shape(), a.shape());
    assert_eq!(sorted_pairs(rebuilt.iter()), sorted_pairs(a.iter()));
}

#[test]
fn blocks_do_not_alias_the_source() {
    let mut a = random_sbm(4, 16, 16, 64);
    let b = BlockedSparseBinaryMatrix::new(&a, 5).unwrap();
    let snapshot = b.clone();
    a.sort_by_hilbert();
    a.transpose();
    assert_eq!(b, snapshot);
}

#[test]
fn zero_block_height_rejected() {
    let a = random_sbm(5, 4, 4, 4);
    let err = BlockedSparseBinaryMatrix::new(&a, 0).unwrap_err();
    assert!(matches!(err, SbmError::InvalidBlockHeight));
}

#[test]
fn empty_matrix_has_no_blocks() {
    let a = SparseBinaryMatrix::from_parts(0, 5, vec![], vec![]).unwrap();
    let b = BlockedSparseBinaryMatrix::new(&a, 3).unwrap();
    assert_eq!(b.nblocks(), 0);
    assert_eq!(b.start_rows(), &[0]);
    assert_eq!(b.nnz(), 0);
}

#[test]
fn rows_without_entries_still_get_blocks() {
    let a = SparseBinaryMatrix::from_parts(9, 3, vec![8, 8], vec![0, 2]).unwrap();
    let b = BlockedSparseBinaryMatrix::new(&a, 2).unwrap();
    assert_eq!(b.nblocks(), 5);
    assert_eq!(b.blocks()[4].nnz(), 2);
    assert!(b.blocks()[..4].iter().all(|blk| blk.nnz() == 0));
    assert_partition(&a, &b);
}

#[test]
fn hilbert_block_sort_preserves_partition() {
    let a = random_sbm(6, 300, 120, 5000);
    for h in [1, 13, 64, 300] {
        let mut b = BlockedSparseBinaryMatrix::new(&a, h).unwrap();
        b.sort_blocks_hilbert();
        assert_partition(&a, &b);
    }
}

#[test]
fn hilbert_block_sort_walks_each_tile() {
    // one 2-row block over 4 columns: tiles (cols 0..2) then (cols 2..4),
    // each visited as (col, row) along the order-2 curve
    let row = vec![1, 0, 1, 0, 1, 0, 1, 0];
    let col = vec![3, 3, 2, 2, 1, 1, 0, 0];
    let a = SparseBinaryMatrix::from_parts(2, 4, row, col).unwrap();
    let mut b = BlockedSparseBinaryMatrix::new(&a, 2).unwrap();
    b.sort_blocks_hilbert();
    let order: Vec<(u32, u32)> = b.blocks()[0].iter().collect();
    assert_eq!(
        order,
        vec![(0, 0), (1, 0), (1, 1), (0, 1), (0, 2), (1, 2), (1, 3), (0, 3)]
    );
}

#[test]
fn hilbert_block_sort_uses_block_relative_rows() {
    let a = random_sbm(7, 50, 9, 400);
    let mut b = BlockedSparseBinaryMatrix::new(&a, 8).unwrap();
    b.sort_blocks_hilbert();
    let first = b.blocks()[1].iter().next().unwrap();
    assert!((8..16).contains(&(first.0 as usize)));
}

#[test]
fn row_major_block_sort_orders_rows_then_cols() {
    let a = random_sbm(8, 64, 30, 2000);
    let mut b = BlockedSparseBinaryMatrix::new(&a, 10).unwrap();
    b.sort_blocks_row_major();
    assert_partition(&a, &b);
    for block in b.blocks() {
        let pairs: Vec<(u32, u32)> = block.iter().collect();
        assert!(pairs.windows(2).all(|w| w[0] <= w[1]));
    }
}
