//! Canonical logging macros

/// Log an error tree at the level its code maps to
///
/// Emits `component`, `op`, `event = "error"`, `err.code`, `err.status`,
/// `err.target` and the full rendering as `message`. Extra fields go after
/// the error.
///
/// # Example
///
/// ```
/// # use errtree_core::{log_err, ErrorNode};
/// let err = ErrorNode::new().with_code(404).with_message("order not found");
/// log_err!("load_order", err);
/// log_err!("load_order", err, order_id = "o-1");
/// ```
#[macro_export]
macro_rules! log_err {
    (@at $level:ident, $op:expr, $err:ident, $($field:tt)*) => {
        tracing::$level!(
            component = module_path!(),
            op = $op,
            event = $crate::schema::EVENT_ERROR,
            err.code = $err.code(),
            err.status = $err.status_code(),
            err.target = $err.target(),
            message = %$err,
            $($field)*
        )
    };
    ($op:expr, $err:expr $(, $($field:tt)*)?) => {{
        let err: &$crate::ErrorNode = &$err;
        match $crate::codes::log_level(err.code()) {
            tracing::Level::ERROR => $crate::log_err!(@at error, $op, err, $($($field)*)?),
            tracing::Level::WARN => $crate::log_err!(@at warn, $op, err, $($($field)*)?),
            _ => $crate::log_err!(@at info, $op, err, $($($field)*)?),
        }
    }};
}
