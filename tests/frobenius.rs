use std::sync::Barrier;

use artin_frobenius::artin::engine::DispatchTable;
use artin_frobenius::artin::galois_group::NumberFieldGaloisGroup;
use artin_frobenius::artin::records::ConjugacyClassIndex;
use artin_frobenius::artin::representation::ArtinRepresentation;
use artin_frobenius::algorithms::erathostenes::enumerate_primes;
use artin_frobenius::error::EngineError;
use artin_frobenius::permutation::CycleType;
use artin_frobenius::ring::*;
use artin_frobenius::rings::float_complex::Complex64;
use artin_frobenius::tracing::LogAlgorithmSubscriber;

// Galois group A_4; the classes are 1 = identity, 2 = double transpositions, 3 and 4 = 3-cycles
const X4_PLUS_8X_PLUS_12: &str = r#"{
    "Polynomial": ["12", "8", "0", "0", "1"],
    "FrobResolvents": [
        {"Algorithm": "CYC", "CycleType": [1, 1, 1, 1], "Classes": 1},
        {"Algorithm": "CYC", "CycleType": [2, 2], "Classes": 2},
        {"Algorithm": "ALT", "CycleType": [1, 3], "Data": [2, 3, 1, 4], "Classes": [
            {"RootOf": ["-576", "1"], "ConjugacyClass": 3},
            {"RootOf": ["576", "1"], "ConjugacyClass": 4}
        ]}
    ]
}"#;

// cyclic of order 3, conductor 9
const X3_MINUS_3X_PLUS_1: &str = r#"{
    "Polynomial": [1, -3, 0, 1],
    "FrobResolvents": [
        {"Algorithm": "CYC", "CycleType": [1, 1, 1], "Classes": 1},
        {"Algorithm": "RES", "CycleType": [3], "Data": {"Powers": [1], "Resolvent": [0, 0, 1]}, "Classes": [
            {"RootOf": ["-6", "1"], "ConjugacyClass": 2},
            {"RootOf": ["3", "1"], "ConjugacyClass": 3}
        ]}
    ]
}"#;

// Galois group S_3; the classes are 1 = identity, 2 = transpositions, 3 = 3-cycles
const X3_MINUS_2: &str = r#"{
    "Polynomial": ["-2", "0", "0", "1"],
    "FrobResolvents": [
        {"Algorithm": "CYC", "CycleType": [1, 1, 1], "Classes": 1},
        {"Algorithm": "CYC", "CycleType": [1, 2], "Data": null, "Classes": 2},
        {"Algorithm": "CYC", "CycleType": [3], "Classes": 3}
    ]
}"#;

fn parse(json: &str) -> NumberFieldGaloisGroup {
    serde_json::from_str(json).unwrap()
}

#[test]
fn test_cyc_x3_minus_2() {
    LogAlgorithmSubscriber::init_test();
    let nf = parse(X3_MINUS_2);
    for p in enumerate_primes(5, 100) {
        let expected = if p % 3 == 2 {
            2
        } else if nf.frobenius_cycle_type(p).unwrap() == CycleType::new(vec![1, 1, 1]) {
            1
        } else {
            3
        };
        assert_eq!(ConjugacyClassIndex::new(expected), nf.from_prime_to_conjugacy_class_index(p).unwrap());
    }
    assert_eq!(Err(EngineError::BadPrime { prime: 2 }), nf.from_prime_to_conjugacy_class_index(2));
}

#[test]
fn test_res_cyclic_cubic() {
    LogAlgorithmSubscriber::init_test();
    let nf = parse(X3_MINUS_3X_PLUS_1);
    for p in enumerate_primes(5, 200) {
        let expected = match p % 9 {
            1 | 8 => 1,
            2 | 7 => 2,
            _ => 3
        };
        assert_eq!(ConjugacyClassIndex::new(expected), nf.from_prime_to_conjugacy_class_index(p).unwrap(), "wrong class at p = {}", p);
    }
    assert_eq!(Err(EngineError::BadPrime { prime: 3 }), nf.from_prime_to_conjugacy_class_index(3));
}

#[test]
fn test_res_cyclic_cubic_large_primes() {
    let nf = parse(X3_MINUS_3X_PLUS_1);
    // 9223372036854775837 = 1, 9223372036854776063 = 2, 9223372036854775931 = 5 mod 9
    assert_eq!(ConjugacyClassIndex::new(1), nf.from_prime_to_conjugacy_class_index(9223372036854775837).unwrap());
    assert_eq!(ConjugacyClassIndex::new(2), nf.from_prime_to_conjugacy_class_index(9223372036854776063).unwrap());
    assert_eq!(ConjugacyClassIndex::new(3), nf.from_prime_to_conjugacy_class_index(9223372036854775931).unwrap());
}

#[test]
fn test_alt_a4() {
    LogAlgorithmSubscriber::init_test();
    let nf = parse(X4_PLUS_8X_PLUS_12);
    // Frobenius is a 3-cycle at these primes, and alpha = 576 exactly for p = 2, 7 mod 9
    let expected_classes = [
        (5, 4), (7, 3), (11, 3), (13, 4), (23, 4), (29, 3), (31, 4), (41, 4), (43, 3), (47, 3),
        (59, 4), (61, 3), (67, 4), (79, 3), (83, 3), (97, 3), (101, 3), (103, 4), (113, 4),
        (9223372036854775931, 4), (9223372036854776063, 3)
    ];
    for (p, class) in expected_classes {
        assert_eq!(CycleType::new(vec![1, 3]), nf.frobenius_cycle_type(p).unwrap());
        assert_eq!(ConjugacyClassIndex::new(class), nf.from_prime_to_conjugacy_class_index(p).unwrap(), "wrong class at p = {}", p);
    }
    for p in enumerate_primes(5, 150).into_iter().filter(|p| p % 9 == 1 || p % 9 == 8) {
        let expected = if nf.frobenius_cycle_type(p).unwrap() == CycleType::new(vec![1, 1, 1, 1]) {
            1
        } else {
            assert_eq!(CycleType::new(vec![2, 2]), nf.frobenius_cycle_type(p).unwrap());
            2
        };
        assert_eq!(ConjugacyClassIndex::new(expected), nf.from_prime_to_conjugacy_class_index(p).unwrap());
    }
    // 2 divides the index of Z[x]/(f)
    assert_eq!(Err(EngineError::IndexDivisor { prime: 2 }), nf.from_prime_to_conjugacy_class_index(2));
}

#[test]
fn test_unknown_algorithm_in_record() {
    let nf = parse(r#"{
        "Polynomial": [-2, 0, 0, 1],
        "FrobResolvents": [{"Algorithm": "SYM", "CycleType": [3], "Classes": 3}]
    }"#);
    let error = nf.from_prime_to_conjugacy_class_index(7).unwrap_err();
    assert_eq!(EngineError::UnknownAlgorithm("SYM".to_owned()), error);
}

#[test]
fn test_missing_cycle_type() {
    let nf = parse(r#"{
        "Polynomial": [-2, 0, 0, 1],
        "FrobResolvents": [{"Algorithm": "CYC", "CycleType": [1, 2], "Classes": 2}]
    }"#);
    assert!(matches!(nf.from_prime_to_conjugacy_class_index(7), Err(EngineError::MissingCycleType { .. })));
    assert_eq!(ConjugacyClassIndex::new(2), nf.from_prime_to_conjugacy_class_index(5).unwrap());
}

#[test]
fn test_deterministic() {
    let first = parse(X4_PLUS_8X_PLUS_12);
    let second = parse(X4_PLUS_8X_PLUS_12);
    let primes = enumerate_primes(5, 120);
    assert_eq!(first.conjugacy_class_indices(&primes), second.conjugacy_class_indices(&primes));
    assert_eq!(first.dispatch_table().unwrap().cycle_types(), second.dispatch_table().unwrap().cycle_types());
}

#[test]
fn test_conjugacy_class_indices() {
    let nf = parse(X3_MINUS_3X_PLUS_1);
    let primes = [3, 5, 17, 19, 29, 31];
    let result = nf.conjugacy_class_indices(&primes);
    assert_eq!(primes.len(), result.len());
    assert_eq!(Err(EngineError::BadPrime { prime: 3 }), result[0]);
    assert_eq!(Ok(ConjugacyClassIndex::new(3)), result[1]);
    assert_eq!(Ok(ConjugacyClassIndex::new(1)), result[2]);
    assert_eq!(Ok(ConjugacyClassIndex::new(1)), result[3]);
    assert_eq!(Ok(ConjugacyClassIndex::new(2)), result[4]);
    assert_eq!(Ok(ConjugacyClassIndex::new(3)), result[5]);
}

#[test]
fn test_concurrent_memoization() {
    LogAlgorithmSubscriber::init_test();
    let nf = parse(X4_PLUS_8X_PLUS_12);
    let primes = enumerate_primes(5, 60);
    let thread_count = 8;
    let barrier = Barrier::new(thread_count);
    let tables = std::thread::scope(|scope| {
        let handles = (0..thread_count).map(|i| {
            let nf = &nf;
            let primes = &primes;
            let barrier = &barrier;
            scope.spawn(move || {
                barrier.wait();
                let table = nf.dispatch_table().unwrap() as *const DispatchTable as usize;
                let p = primes[i % primes.len()];
                _ = nf.from_prime_to_conjugacy_class_index(p).unwrap();
                table
            })
        }).collect::<Vec<_>>();
        handles.into_iter().map(|handle| handle.join().unwrap()).collect::<Vec<_>>()
    });
    assert!(tables.iter().all(|table| *table == tables[0]));
    assert_eq!(tables[0], nf.dispatch_table().unwrap() as *const DispatchTable as usize);
    assert_eq!(1, nf.dispatch_table_builds());
}

#[test]
fn test_artin_representation_of_cubic_character() {
    LogAlgorithmSubscriber::init_test();
    // the character A_4 -> C_3 -> C^*, which is a Dirichlet character modulo 9 of order 3
    let nf = parse(X4_PLUS_8X_PLUS_12);
    let rep: ArtinRepresentation = serde_json::from_str(r#"{
        "Dim": 1,
        "HardPrimes": [2, 3],
        "HardFactors": [5, 5],
        "BadPrimes": [3],
        "CharacterField": 3,
        "LocalFactors": [
            [[1], [-1]],
            [[1], [-1]],
            [[1], [0, -1]],
            [[1], [0, 0, -1]],
            [[1]]
        ]
    }"#).unwrap();
    let CC = Complex64::RING;
    let zeta = CC.root_of_unity(1, 3);
    let coefficients = rep.coefficients_list(&nf, 100).unwrap();
    let a = |n: usize| coefficients[n - 1];
    let approx_eq = |lhs, rhs| CC.is_absolute_approx_eq(lhs, rhs, 1e-9);

    assert!(approx_eq(CC.one(), a(1)));
    assert!(approx_eq(CC.zero(), a(3)));
    assert!(approx_eq(CC.zero(), a(6)));
    assert!(approx_eq(CC.one(), a(17)));
    assert!(approx_eq(CC.one(), a(19)));
    // the character is either 2 -> zeta or 2 -> zeta^2
    let chi_2 = a(11);
    assert!(approx_eq(chi_2, zeta) || approx_eq(chi_2, CC.square(&zeta)));
    for p in enumerate_primes(5, 100) {
        let expected = CC.pow(chi_2, match p % 9 { 1 | 8 => 0, 2 | 7 => 1, _ => 2 });
        assert!(approx_eq(expected, a(p as usize)), "wrong coefficient at p = {}", p);
        assert!(approx_eq(CC.negate(expected), rep.central_character(&nf, p).unwrap()));
    }
    assert!(approx_eq(CC.mul(a(5), a(7)), a(35)));
    assert!(approx_eq(CC.pow(a(5), 2), a(25)));
    assert!(approx_eq(CC.mul(a(4), a(25)), a(100)));
}
