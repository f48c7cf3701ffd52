//! Assertion macros for lifecycle results.

/// Unwraps an `Ok`, panicking with the error's `Debug` form otherwise.
#[macro_export]
macro_rules! assert_ok {
    ($expr:expr) => {
        match $expr {
            Ok(val) => val,
            Err(err) => panic!("expected the lifecycle call to succeed, got {:?}", err),
        }
    };
    ($expr:expr, $($arg:tt)+) => {
        match $expr {
            Ok(val) => val,
            Err(err) => panic!("{}: expected success, got {:?}", format!($($arg)+), err),
        }
    };
}

/// Unwraps an `Err`, panicking with the value's `Debug` form otherwise.
#[macro_export]
macro_rules! assert_err {
    ($expr:expr) => {
        match $expr {
            Ok(val) => panic!("expected the lifecycle call to fail, got {:?}", val),
            Err(err) => err,
        }
    };
    ($expr:expr, $($arg:tt)+) => {
        match $expr {
            Ok(val) => panic!("{}: expected failure, got {:?}", format!($($arg)+), val),
            Err(err) => err,
        }
    };
}

/// Asserts a result failed with the given [`ErrorCode`](hlf_types::ErrorCode)
/// and returns the error.
#[macro_export]
macro_rules! assert_error_code {
    ($expr:expr, $code:expr) => {{
        let err = $crate::assert_err!($expr);
        assert_eq!(
            ::hlf_types::ErrorCode::code(&err),
            $code,
            "unexpected error: {}",
            err
        );
        err
    }};
}
