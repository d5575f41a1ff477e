//! Length-limited Huffman tree construction.
//!
//! Code lengths are derived with Huffman's algorithm (iterative merging of
//! the two smallest subtrees) and then redistributed with the pair-shifting
//! scheme of ITU-T T.81 Annex K.2 whenever the unconstrained tree exceeds the
//! requested depth limit.

use crate::HuffmanTable;

/// Maximum codeword length representable in a table.
pub const MAX_CODE_LENGTH: usize = 16;

/// Number of real symbol values (coefficient-value categories).
pub const ALPHABET_SIZE: usize = 256;

/// Index of the reserved sentinel slot.
///
/// The sentinel participates in tree construction with a count of one so that
/// the all-ones bit pattern of the longest code is never assigned to a real
/// symbol. It is never emitted in a table's symbol list.
pub const SENTINEL: usize = ALPHABET_SIZE;

// Depth cap for the unconstrained tree. A chain of depth `d` needs a total
// count of at least Fib(d + 2); with 32-bit counts over a 257-slot alphabet
// the deepest possible chain stays below 60.
const MAX_TREE_DEPTH: usize = 64;

/// Compute per-symbol code lengths for `counts`, bounded by `tree_limit`.
///
/// `depth[s]` receives the bit length of symbol `s`, or 0 if the symbol is
/// unused. The result satisfies the Kraft inequality with
/// `max(depth) <= tree_limit`, and equals exactly `tree_limit` whenever the
/// unconstrained tree would be deeper. Ties between equal counts are broken
/// by ascending symbol index, so identical input yields identical output.
///
/// Edge cases: a single nonzero count receives depth 1; all-zero counts yield
/// all-zero depths (the table is unused).
pub fn create_huffman_tree(counts: &[u32], tree_limit: usize, depth: &mut [u8]) {
    debug_assert_eq!(counts.len(), depth.len());
    debug_assert!(tree_limit >= 1 && tree_limit <= MAX_TREE_DEPTH);

    let n = counts.len();
    depth.fill(0);

    let num_nonzero = counts.iter().filter(|&&c| c > 0).count();
    debug_assert!(num_nonzero <= 1 << tree_limit);

    if num_nonzero == 0 {
        return;
    }
    if num_nonzero == 1 {
        let only = counts.iter().position(|&c| c > 0).unwrap_or(0);
        depth[only] = 1;
        return;
    }

    // Huffman's algorithm. Subtrees are chained through `others` so that a
    // merge can deepen every leaf it contains; a merged subtree keeps the
    // smaller of the two original indices as its identity.
    let mut freq: Vec<u64> = counts.iter().map(|&c| u64::from(c)).collect();
    let mut codesize = vec![0_usize; n];
    let mut others: Vec<Option<usize>> = vec![None; n];

    loop {
        // The two smallest active counts; ties resolve toward the smaller
        // symbol index.
        let mut c1: Option<usize> = None;
        let mut c2: Option<usize> = None;
        for (i, &f) in freq.iter().enumerate() {
            if f == 0 {
                continue;
            }
            match c1 {
                None => c1 = Some(i),
                Some(a) if f < freq[a] => {
                    c2 = c1;
                    c1 = Some(i);
                }
                Some(_) => match c2 {
                    None => c2 = Some(i),
                    Some(b) if f < freq[b] => c2 = Some(i),
                    Some(_) => {}
                },
            }
        }

        let (Some(a), Some(b)) = (c1, c2) else {
            break;
        };
        let (keep, merge) = if a < b { (a, b) } else { (b, a) };

        freq[keep] += freq[merge];
        freq[merge] = 0;

        // Deepen every leaf in the kept subtree, chain the merged subtree
        // onto it, and deepen that one as well.
        codesize[keep] += 1;
        let mut node = keep;
        while let Some(next) = others[node] {
            node = next;
            codesize[node] += 1;
        }
        others[node] = Some(merge);

        codesize[merge] += 1;
        let mut node = merge;
        while let Some(next) = others[node] {
            node = next;
            codesize[node] += 1;
        }
    }

    let deepest = codesize.iter().copied().max().unwrap_or(0);
    debug_assert!(deepest <= MAX_TREE_DEPTH);

    if deepest <= tree_limit {
        for (d, &size) in depth.iter_mut().zip(&codesize) {
            *d = size as u8;
        }
        return;
    }

    // Annex K.2: starting from the deepest level, move leaves in pairs one
    // level up and pay for each pair by splitting a leaf at the nearest
    // shallower populated level. Every step leaves the Kraft sum unchanged,
    // and the deepest level of a complete tree always holds an even number
    // of leaves, so the subtraction below cannot underflow.
    let mut bits = [0_u32; MAX_TREE_DEPTH + 1];
    for &size in &codesize {
        if size > 0 {
            bits[size] += 1;
        }
    }

    for i in ((tree_limit + 1)..=deepest).rev() {
        while bits[i] > 0 {
            let mut j = i - 2;
            while j > 0 && bits[j] == 0 {
                j -= 1;
            }
            if j == 0 {
                // Unreachable for alphabets that fit the limit.
                break;
            }

            debug_assert!(bits[i] >= 2);
            bits[i] -= 2;
            bits[i - 1] += 1;
            bits[j + 1] += 2;
            bits[j] -= 1;
        }
    }

    // Redistribute: symbols keep their relative order (original code size,
    // then ascending index) and are dealt out over the adjusted counts.
    let mut order: Vec<usize> = (0..n).filter(|&i| codesize[i] > 0).collect();
    order.sort_by_key(|&i| (codesize[i], i));

    let mut next = order.into_iter();
    for len in 1..=tree_limit {
        for _ in 0..bits[len] {
            if let Some(i) = next.next() {
                depth[i] = len as u8;
            }
        }
    }
}

/// Build an optimal canonical table for a histogram over the real alphabet.
///
/// This is the encode-path entry point: the sentinel slot is appended with a
/// count of one, code lengths are computed with a limit of
/// [`MAX_CODE_LENGTH`], and one code slot at the longest populated length is
/// dropped again so that the all-ones codeword stays unassigned. Symbols are
/// emitted in canonical wire order (by length, then ascending value).
///
/// An all-zero histogram produces an empty table, meaning the table is
/// unused.
pub fn build_optimal_table(histogram: &[u32; ALPHABET_SIZE]) -> HuffmanTable {
    let mut counts = [0_u32; ALPHABET_SIZE + 1];
    counts[..ALPHABET_SIZE].copy_from_slice(histogram);
    counts[SENTINEL] = 1;

    let mut depth = [0_u8; ALPHABET_SIZE + 1];
    create_huffman_tree(&counts, MAX_CODE_LENGTH, &mut depth);

    let mut per_length = [0_u32; MAX_CODE_LENGTH + 1];
    for &d in depth.iter() {
        if d > 0 {
            per_length[d as usize] += 1;
        }
    }

    // Drop one slot at the longest populated length. Canonical assignment
    // hands out the all-ones pattern last, so the dropped slot is exactly
    // the codeword the sentinel reserved.
    if let Some(longest) = (1..=MAX_CODE_LENGTH).rev().find(|&l| per_length[l] > 0) {
        per_length[longest] -= 1;
    }

    // Deal the remaining slots out to the real symbols, preserving their
    // relative order.
    let mut order: Vec<usize> = (0..ALPHABET_SIZE).filter(|&s| depth[s] > 0).collect();
    order.sort_by_key(|&s| (depth[s], s));

    let mut lengths = [0_u8; ALPHABET_SIZE];
    let mut next = order.into_iter();
    for len in 1..=MAX_CODE_LENGTH {
        for _ in 0..per_length[len] {
            if let Some(s) = next.next() {
                lengths[s] = len as u8;
            }
        }
    }

    let mut out_counts = [0_u32; MAX_CODE_LENGTH + 1];
    let mut values = Vec::new();
    for len in 1..=MAX_CODE_LENGTH as u8 {
        for (symbol, &length) in lengths.iter().enumerate() {
            if length == len {
                out_counts[len as usize] += 1;
                values.push(symbol as u8);
            }
        }
    }

    HuffmanTable {
        counts: out_counts,
        values,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canonical::assign_codes;

    /// Kraft sum scaled by `2^16`; at most 65536 for a feasible code.
    fn kraft_sum(depth: &[u8]) -> u64 {
        depth
            .iter()
            .filter(|&&d| d > 0)
            .map(|&d| 1_u64 << (MAX_CODE_LENGTH - d as usize))
            .sum()
    }

    #[test]
    fn two_symbols_get_one_bit_each() {
        let mut depth = [0_u8; 2];
        create_huffman_tree(&[10, 1], MAX_CODE_LENGTH, &mut depth);
        assert_eq!(depth, [1, 1]);
    }

    #[test]
    fn single_symbol_gets_depth_one() {
        let mut depth = [0_u8; 3];
        create_huffman_tree(&[0, 7, 0], MAX_CODE_LENGTH, &mut depth);
        assert_eq!(depth, [0, 1, 0]);
    }

    #[test]
    fn all_zero_histogram_is_unused() {
        let mut depth = [0xff_u8; 4];
        create_huffman_tree(&[0, 0, 0, 0], MAX_CODE_LENGTH, &mut depth);
        assert_eq!(depth, [0, 0, 0, 0]);
    }

    #[test]
    fn skewed_counts_stay_feasible() {
        let counts = [50, 20, 20, 5, 3, 1, 1];
        let mut depth = [0_u8; 7];
        create_huffman_tree(&counts, MAX_CODE_LENGTH, &mut depth);

        assert!(depth.iter().all(|&d| d > 0 && d as usize <= MAX_CODE_LENGTH));
        assert!(kraft_sum(&depth) <= 1 << MAX_CODE_LENGTH);
        // Huffman trees over all-positive counts are complete.
        assert_eq!(kraft_sum(&depth), 1 << MAX_CODE_LENGTH);
        // More frequent symbols never get longer codes.
        assert!(depth[0] <= depth[4]);
    }

    #[test]
    fn identical_input_yields_identical_output() {
        // Plenty of ties.
        let counts: Vec<u32> = (0..100).map(|i| [3, 7, 3, 1][i % 4]).collect();
        let mut first = vec![0_u8; 100];
        let mut second = vec![0_u8; 100];
        create_huffman_tree(&counts, MAX_CODE_LENGTH, &mut first);
        create_huffman_tree(&counts, MAX_CODE_LENGTH, &mut second);
        assert_eq!(first, second);
        assert!(kraft_sum(&first) <= 1 << MAX_CODE_LENGTH);
    }

    #[test]
    fn fibonacci_counts_are_limited_to_exactly_sixteen() {
        // Fibonacci counts give the unconstrained tree one leaf per level,
        // far deeper than 16.
        let mut counts = [0_u32; 24];
        let (mut a, mut b) = (1_u32, 1_u32);
        for c in counts.iter_mut() {
            *c = a;
            let next = a + b;
            a = b;
            b = next;
        }

        let mut depth = [0_u8; 24];
        create_huffman_tree(&counts, MAX_CODE_LENGTH, &mut depth);

        let max = depth.iter().copied().max().unwrap();
        assert_eq!(max as usize, MAX_CODE_LENGTH);
        assert!(kraft_sum(&depth) <= 1 << MAX_CODE_LENGTH);
        assert!(depth.iter().all(|&d| d > 0));
    }

    #[test]
    fn three_hundred_symbols_build_within_the_limit() {
        let counts: Vec<u32> = (0..300).map(|i| 1000 + (i % 3) as u32).collect();
        let mut depth = vec![0_u8; 300];
        create_huffman_tree(&counts, MAX_CODE_LENGTH, &mut depth);

        assert!(depth.iter().all(|&d| d > 0 && d as usize <= MAX_CODE_LENGTH));
        assert!(kraft_sum(&depth) <= 1 << MAX_CODE_LENGTH);
    }

    #[test]
    fn three_hundred_symbols_with_rare_tail_hit_the_limit() {
        // A Fibonacci-shaped head drives the unconstrained tree past 16
        // levels; redistribution must land exactly on the limit.
        let mut counts = vec![0_u32; 300];
        let (mut a, mut b) = (1_u32, 1_u32);
        for c in counts.iter_mut().take(24) {
            *c = a;
            let next = a + b;
            a = b;
            b = next;
        }
        for c in counts.iter_mut().skip(24) {
            *c = 50_000;
        }

        let mut depth = vec![0_u8; 300];
        create_huffman_tree(&counts, MAX_CODE_LENGTH, &mut depth);

        let max = depth.iter().copied().max().unwrap();
        assert_eq!(max as usize, MAX_CODE_LENGTH);
        assert!(kraft_sum(&depth) <= 1 << MAX_CODE_LENGTH);
        assert!(depth.iter().all(|&d| d > 0));
    }

    #[test]
    fn optimal_table_reserves_the_all_ones_codeword() {
        let mut histogram = [0_u32; ALPHABET_SIZE];
        for (i, h) in histogram.iter_mut().enumerate().take(40) {
            *h = 1 + (i as u32 % 7) * 13;
        }

        let table = build_optimal_table(&histogram);
        assert_eq!(table.num_symbols(), 40);

        for cw in assign_codes(&table.counts) {
            let all_ones = (1_u32 << cw.length) - 1;
            assert_ne!(u32::from(cw.code), all_ones, "length {}", cw.length);
        }
    }

    #[test]
    fn optimal_table_from_empty_histogram_is_unused() {
        let table = build_optimal_table(&[0_u32; ALPHABET_SIZE]);
        assert!(table.is_empty());
        assert!(table.counts.iter().all(|&c| c == 0));
    }

    #[test]
    fn optimal_table_for_one_symbol() {
        let mut histogram = [0_u32; ALPHABET_SIZE];
        histogram[77] = 123;

        let table = build_optimal_table(&histogram);
        assert_eq!(table.counts[1], 1);
        assert_eq!(table.values, vec![77]);
    }

    #[test]
    fn optimal_table_orders_symbols_canonically() {
        let mut histogram = [0_u32; ALPHABET_SIZE];
        histogram[9] = 100;
        histogram[3] = 100;
        histogram[200] = 1;
        histogram[100] = 1;

        let table = build_optimal_table(&histogram);

        // Within one length, symbols ascend.
        let mut offset = 0;
        for len in 1..=MAX_CODE_LENGTH {
            let group = &table.values[offset..offset + table.counts[len] as usize];
            assert!(group.windows(2).all(|w| w[0] < w[1]), "length {len}");
            offset += table.counts[len] as usize;
        }
        assert_eq!(offset, table.num_symbols());
    }
}
