use super::sqr_mul::pow_mod;

///
/// The first twelve primes; using them as Miller-Rabin bases gives a
/// deterministic test for all `n < 3.3 * 10^24`, so in particular for all `u64`.
/// 
const WITNESSES: [u64; 12] = [2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37];

fn mul_mod(lhs: u64, rhs: u64, modulus: u64) -> u64 {
    ((lhs as u128 * rhs as u128) % modulus as u128) as u64
}

///
/// Miller-Rabin primality test.
/// 
/// Since the witnesses are fixed, the test is deterministic and exact for
/// all 64-bit integers.
/// 
pub fn is_prime(n: u64) -> bool {
    if n < 2 {
        return false;
    }
    for p in WITNESSES {
        if n == p {
            return true;
        } else if n % p == 0 {
            return false;
        }
    }
    let s = (n - 1).trailing_zeros();
    let d = (n - 1) >> s;
    'witness: for a in WITNESSES {
        let mut x = pow_mod(a, d, n);
        if x == 1 || x == n - 1 {
            continue;
        }
        for _ in 1..s {
            x = mul_mod(x, x, n);
            if x == n - 1 {
                continue 'witness;
            }
        }
        return false;
    }
    return true;
}

#[test]
pub fn test_is_prime() {
    assert!(is_prime(2));
    assert!(is_prime(3));
    assert!(is_prime(5));
    assert!(is_prime(7));
    assert!(is_prime(11));
    assert!(is_prime(22531));
    assert!(is_prime(18446744073709551557));
    assert!(!is_prime(0));
    assert!(!is_prime(1));
    assert!(!is_prime(4));
    assert!(!is_prime(22532));
    // strong pseudoprime to the bases 2, 3, 5, 7
    assert!(!is_prime(3215031751));
    assert!(!is_prime(1 << 40));
}
