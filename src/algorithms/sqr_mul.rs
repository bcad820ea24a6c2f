///
/// Computes `base^power` in a generic monoid, given by the two operations
/// `square` and `multiply_base` (multiplying the current value by the base).
/// 
/// The bits of the exponent are processed from the most significant one, so
/// only one copy of the base is required.
/// 
pub fn generic_abs_square_and_multiply<T, U, F, H>(base: U, power: u64, mut square: F, mut multiply_base: H, identity: T) -> T
    where F: FnMut(T) -> T, 
        H: FnMut(&U, T) -> T
{
    if power == 0 {
        return identity;
    } else if power == 1 {
        return multiply_base(&base, identity);
    }

    let mut result = identity;
    for i in (0..=(63 - power.leading_zeros())).rev() {
        if (power >> i) & 1 == 1 {
            result = multiply_base(&base, square(result));
        } else {
            result = square(result);
        }
    }
    return result;
}

///
/// Computes `base^power mod modulus` for integers.
/// 
pub fn pow_mod(base: u64, power: u64, modulus: u64) -> u64 {
    assert!(modulus > 0);
    let reduced_base = base % modulus;
    generic_abs_square_and_multiply(
        reduced_base, 
        power, 
        |a| ((a as u128 * a as u128) % modulus as u128) as u64, 
        |a, b| ((*a as u128 * b as u128) % modulus as u128) as u64, 
        1 % modulus
    )
}

#[test]
fn test_pow() {
    assert_eq!(3 * 3, generic_abs_square_and_multiply(3, 2, |a: i64| a * a, |a, b| *a * b, 1));
    assert_eq!(3 * 3 * 3 * 3 * 3, generic_abs_square_and_multiply(3, 5, |a: i64| a * a, |a, b| *a * b, 1));
    assert_eq!(1, generic_abs_square_and_multiply(3, 0, |a: i64| a * a, |a, b| *a * b, 1));
}

#[test]
fn test_pow_mod() {
    assert_eq!(1, pow_mod(2, 10, 1023));
    assert_eq!(4, pow_mod(2, 12, 1023));
    assert_eq!(0, pow_mod(5, 3, 1));
    // Fermat's little theorem for a prime close to 2^64
    assert_eq!(1, pow_mod(3, 18446744073709551556, 18446744073709551557));
}
