//! Feature-gated instrumentation for the SSIM entry points.
//!
//! With the `tracing` feature, `compute` and `compute_reference` run inside
//! info spans, the final score is an info event and rejected inputs are error
//! events. Without it, spans and events vanish and errors go to stderr in
//! debug builds.

/// Info span around one SSIM evaluation, entered with `.entered()`.
#[cfg(feature = "tracing")]
macro_rules! trace_span {
    ($name:expr $(, $($field:tt)*)?) => {
        tracing::info_span!($name $(, $($field)*)?)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_span {
    ($name:expr $(, $($field:tt)*)?) => {
        $crate::trace::NoopSpan
    };
}

/// Info event carrying the measured score.
#[cfg(feature = "tracing")]
macro_rules! trace_event {
    ($name:expr, $($key:ident = $value:expr),+ $(,)?) => {
        tracing::info!(name: $name, $($key = $value),+)
    };
}

// Field values are still evaluated so the score stays a used binding.
#[cfg(not(feature = "tracing"))]
macro_rules! trace_event {
    ($name:expr, $($key:ident = $value:expr),+ $(,)?) => {
        let _ = ($($value,)+);
    };
}

/// Report an allocation or validation failure.
///
/// Routed to `tracing::error!` with the `tracing` feature. Without it, debug
/// builds print the diagnostic to stderr and release builds drop it.
#[cfg(feature = "tracing")]
macro_rules! report_error {
    ($err:expr) => {
        tracing::error!(error = %$err, "ssim computation failed")
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! report_error {
    ($err:expr) => {
        if cfg!(debug_assertions) {
            eprintln!("ssimtile: {}", $err);
        }
    };
}

pub(crate) use report_error;
pub(crate) use trace_event;
pub(crate) use trace_span;

/// Stand-in guard for `trace_span!` without the `tracing` feature.
#[cfg(not(feature = "tracing"))]
pub struct NoopSpan;

#[cfg(not(feature = "tracing"))]
impl NoopSpan {
    /// Matches `Span::entered()`.
    #[inline]
    pub fn entered(self) -> Self {
        self
    }
}
