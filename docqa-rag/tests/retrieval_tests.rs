//! Property tests for vector index search ordering.

use docqa_rag::{Chunk, VectorIndex};
use proptest::prelude::*;

const DIM: usize = 16;

/// Generate a non-zero L2-normalized embedding of the given dimension.
fn arb_normalized_embedding(dim: usize) -> impl Strategy<Value = Vec<f32>> {
    proptest::collection::vec(-1.0f32..1.0f32, dim).prop_filter_map("non-zero embedding", |mut v| {
        let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm < 1e-8 {
            return None;
        }
        for val in &mut v {
            *val /= norm;
        }
        Some(v)
    })
}

fn chunk(i: usize) -> Chunk {
    Chunk { text: format!("chunk {i}"), page: None, sequence_index: i }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// For any set of embedded chunks, search returns results in
    /// descending score order, bounded by both `k` and the row count.
    #[test]
    fn results_ordered_descending_and_bounded_by_k(
        embeddings in proptest::collection::vec(arb_normalized_embedding(DIM), 1..20),
        query in arb_normalized_embedding(DIM),
        k in 1usize..25,
    ) {
        let count = embeddings.len();
        let chunks = (0..count).map(chunk).collect();
        let index = VectorIndex::build("test-model", DIM, chunks, embeddings).unwrap();

        let results = index.search(&query, k).unwrap();

        prop_assert!(results.len() <= k);
        prop_assert!(results.len() <= count);

        for window in results.windows(2) {
            prop_assert!(
                window[0].score >= window[1].score,
                "results not in descending order: {} < {}",
                window[0].score,
                window[1].score,
            );
        }
    }

    /// Identical embeddings score identically; the tie breaks by
    /// ascending sequence index, so search output is fully deterministic.
    #[test]
    fn equal_scores_break_ties_by_sequence_index(
        embedding in arb_normalized_embedding(DIM),
        copies in 2usize..8,
    ) {
        let chunks = (0..copies).map(chunk).collect();
        let embeddings = vec![embedding.clone(); copies];
        let index = VectorIndex::build("test-model", DIM, chunks, embeddings).unwrap();

        let results = index.search(&embedding, copies).unwrap();
        let order: Vec<usize> = results.iter().map(|r| r.chunk.sequence_index).collect();
        prop_assert_eq!(order, (0..copies).collect::<Vec<_>>());
    }
}

#[test]
fn empty_index_returns_empty_for_any_k() {
    let index = VectorIndex::build("test-model", DIM, vec![], vec![]).unwrap();
    for k in [0, 1, 4, 100] {
        assert!(index.search(&vec![1.0; DIM], k).unwrap().is_empty());
    }
}

#[test]
fn two_rows_with_k_four_yields_two_results() {
    let index = VectorIndex::build(
        "test-model",
        2,
        vec![chunk(0), chunk(1)],
        vec![vec![1.0, 0.0], vec![0.6, 0.8]],
    )
    .unwrap();
    let results = index.search(&[1.0, 0.0], 4).unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].chunk.sequence_index, 0);
}
