//! Call-site macros for building errors

/// Convert each expression with `Arg::from` into a `Vec<Arg>`
///
/// ```
/// use errtree_core::{args, Arg, Code};
///
/// let args = args![Code(404), "missing"];
/// assert_eq!(args, vec![Arg::Code(404), Arg::Text("missing".to_string())]);
/// ```
#[macro_export]
macro_rules! args {
    () => {
        ::std::vec::Vec::<$crate::Arg>::new()
    };
    ($($arg:expr),+ $(,)?) => {
        ::std::vec![$($crate::Arg::from($arg)),+]
    };
}

/// Build an error node from loosely-typed arguments
///
/// ```
/// use errtree_core::{e, Op, Target};
///
/// let err = e!(404, Target::new("order"), Op::new("load_order"));
/// assert_eq!(err.message(), "Not Found");
/// ```
///
/// `e!()` panics: an error needs at least one argument.
#[macro_export]
macro_rules! e {
    () => {
        $crate::e(::std::vec::Vec::new())
    };
    ($($arg:expr),+ $(,)?) => {
        $crate::e($crate::args![$($arg),+])
    };
}

/// Build an error node for a field; the first argument is its target
///
/// ```
/// use errtree_core::{et, Op};
///
/// let err = et!("email", "must not be empty", Op::new("signup"));
/// assert_eq!(err.target(), "email");
/// ```
#[macro_export]
macro_rules! et {
    ($target:expr) => {
        $crate::et($target, ::std::vec::Vec::new())
    };
    ($target:expr, $($arg:expr),+ $(,)?) => {
        $crate::et($target, $crate::args![$($arg),+])
    };
}
