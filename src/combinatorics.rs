/// Rows of the precomputed Pascal triangle: `n` below this is a table lookup.
const TABLE_SIZE: usize = 33;

const fn pascal_triangle() -> [[usize; TABLE_SIZE]; TABLE_SIZE] {
    let mut table = [[0usize; TABLE_SIZE]; TABLE_SIZE];
    let mut n = 0;
    while n < TABLE_SIZE {
        table[n][0] = 1;
        let mut k = 1;
        while k <= n {
            table[n][k] = table[n - 1][k - 1] + table[n - 1][k];
            k += 1;
        }
        n += 1;
    }
    table
}

static PASCAL: [[usize; TABLE_SIZE]; TABLE_SIZE] = pascal_triangle();

/// Exact binomial coefficient `C(n, k)`.
///
/// Small arguments are looked up in a table built at compile time. Larger ones
/// use the running product `res * (n - k + i) / i`, which stays an integer at
/// every step because `res` is always `C(n - k + i, i)` before the division.
pub fn n_choose_k(n: usize, k: usize) -> usize {
    if k > n {
        return 0;
    }
    if n < TABLE_SIZE {
        return PASCAL[n][k];
    }
    let k = k.min(n - k);
    let mut result: usize = 1;
    for i in 1..=k {
        result = result * (n - (k - i)) / i;
    }
    result
}

/// Write the `rank`-th `out.len()`-subset of `0..n` (lexicographic order) into `out`.
///
/// `rank` must be below `n_choose_k(n, out.len())`.
pub fn unrank_combination_into(n: usize, mut rank: usize, out: &mut [usize]) {
    let k = out.len();
    debug_assert!(rank < n_choose_k(n, k));
    let mut x = 0usize;
    for i in 0..k {
        let mut c = x;
        loop {
            let count = n_choose_k(n - c - 1, k - i - 1);
            if count <= rank {
                rank -= count;
                c += 1;
            } else {
                out[i] = c;
                x = c + 1;
                break;
            }
        }
    }
}

pub fn unrank_combination(n: usize, k: usize, rank: usize) -> Vec<usize> {
    let mut combo = vec![0usize; k];
    unrank_combination_into(n, rank, &mut combo);
    combo
}

/// Lexicographic rank of a strictly ascending subset of `0..n`.
pub fn rank_combination(n: usize, indices: &[usize]) -> usize {
    let k = indices.len();
    let mut rank = 0usize;
    for (i, &c) in indices.iter().enumerate() {
        let start = if i == 0 { 0 } else { indices[i - 1] + 1 };
        for j in start..c {
            rank += n_choose_k(n - j - 1, k - i - 1);
        }
    }
    rank
}

/// Advance `combo` to its lexicographic successor among the subsets of `0..n`.
///
/// Returns `false` (leaving `combo` untouched) when it is already the last one.
pub fn next_combination(n: usize, combo: &mut [usize]) -> bool {
    let k = combo.len();
    let Some(pivot) = (0..k).rev().find(|&i| combo[i] < n - k + i) else {
        return false;
    };
    combo[pivot] += 1;
    for i in pivot + 1..k {
        combo[i] = combo[i - 1] + 1;
    }
    true
}
