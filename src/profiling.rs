//! Profiler instrumentation. Spans are only recorded when the `tracy` feature is enabled
//! and a tracy client is running.

/// Open a profiler span that lasts until the end of the enclosing scope.
///
/// Bind the result to a named variable (`let _span = ...`),
/// binding to `_` drops it immediately.
macro_rules! tracy_span {
    ($name:literal, $fn_name:literal) => {
        tracy_client::Client::running()
            .map(|client| client.span_alloc(Some($name), $fn_name, file!(), line!(), 0))
    };
}
