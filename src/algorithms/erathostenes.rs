///
/// Returns all primes `p < B`, in increasing order.
///
/// The sieve only stores odd numbers, i.e. `is_composite[i]` refers to `2i + 1`.
///
pub fn erathostenes(B: u64) -> Vec<u64> {
    if B <= 2 {
        return Vec::new();
    }
    let odd_count = (B / 2) as usize;
    let mut is_composite = vec![false; odd_count];
    let mut result = vec![2];
    for i in 1..odd_count {
        if is_composite[i] {
            continue;
        }
        let n = 2 * i + 1;
        result.push(n as u64);
        // multiples below n^2 have a smaller prime factor and are already marked
        for j in ((n * n / 2)..odd_count).step_by(n) {
            is_composite[j] = true;
        }
    }
    return result;
}

///
/// Returns all primes `p` with `lower <= p < upper`, in increasing order.
///
pub fn enumerate_primes(lower: u64, upper: u64) -> Vec<u64> {
    erathostenes(upper).into_iter().filter(|p| *p >= lower).collect()
}

#[test]
fn test_erathostenes() {
    assert_eq!(Vec::<u64>::new(), erathostenes(2));
    assert_eq!(vec![2], erathostenes(3));
    assert_eq!(vec![2, 3], erathostenes(4));
    assert_eq!(vec![2, 3, 5, 7, 11, 13, 17, 19], erathostenes(20));
    assert_eq!(vec![2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47], erathostenes(49));
    assert_eq!(25, erathostenes(100).len());
    assert_eq!(vec![2, 3, 5, 7, 11, 13, 17, 19, 23], erathostenes(25));
}

#[test]
fn test_enumerate_primes() {
    assert_eq!(vec![11, 13, 17, 19], enumerate_primes(10, 20));
    assert_eq!(vec![2, 3, 5, 7], enumerate_primes(0, 10));
}
