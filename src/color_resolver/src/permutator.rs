/// `n!` for every `n` whose factorial fits in a `u64`.
const FACT_UNTIL_20: [u64; 21] = {
    let mut arr = [0; 21];
    arr[0] = 1;
    let mut i = 1;
    while i < arr.len() {
        arr[i] = arr[i - 1] * i as u64;
        i += 1;
    }
    arr
};

/// `n!`, saturating at `u64::MAX` past `20!`.
pub fn factorial(n: usize) -> u64 {
    FACT_UNTIL_20.get(n).copied().unwrap_or(u64::MAX)
}

/// Step `perm` to its next lexicographic permutation (Pandita's algorithm).
/// Returns `false`, leaving `perm` untouched, once `perm` is the last
/// permutation.
pub fn next_permutation(perm: &mut [u8]) -> bool {
    let len = perm.len();
    if len < 2 {
        return false;
    }

    let mut i = len - 2;
    while perm[i] >= perm[i + 1] {
        if i == 0 {
            return false;
        }
        i -= 1;
    }
    let mut j = len - 1;
    while perm[j] <= perm[i] {
        j -= 1;
    }
    perm.swap(i, j);
    perm[i + 1..].reverse();
    true
}
