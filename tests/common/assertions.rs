//! Assertion macros for store results, money and server ids

/// Unwrap a store or backend result, printing the error on failure
#[macro_export]
macro_rules! assert_ok {
    ($result:expr) => {
        match $result {
            Ok(value) => value,
            Err(e) => panic!("Expected Ok, got Err: {:?}", e),
        }
    };
}

/// Assert that a result failed with an error matching `pattern`.
///
/// The Ok side is not printed, so handles without `Debug` work too.
#[macro_export]
macro_rules! assert_err {
    ($result:expr, $pattern:pat) => {
        match $result {
            Err($pattern) => {}
            Ok(_) => panic!("Expected Err matching `{}`, got Ok", stringify!($pattern)),
            Err(e) => panic!(
                "Expected Err matching `{}`, got: {:?}",
                stringify!($pattern),
                e
            ),
        }
    };
}

/// Assert that two money amounts agree to the cent
#[macro_export]
macro_rules! assert_amount_eq {
    ($left:expr, $right:expr) => {
        let (left, right): (f64, f64) = ($left, $right);
        assert!(
            (left - right).abs() < 0.005,
            "Amounts differ: {:.2} vs {:.2}",
            left,
            right
        );
    };
}

/// Assert that an id was assigned by the mock backend (`srv-N`)
#[macro_export]
macro_rules! assert_server_id {
    ($id:expr) => {
        let id: &str = &$id;
        assert!(id.starts_with("srv-"), "Expected a server id, got '{}'", id);
    };
}
