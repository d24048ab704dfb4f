//! Progress reporting for an optimization run.
//!
//! The optimizer reports a fraction in `0.0..=1.0` plus a short message at
//! each milestone. Fractions are monotonic within one run and the last
//! report is always `1.0`.

/// Receiver of progress reports
pub trait ProgressSink: Send + Sync {
    fn report(&self, fraction: f32, message: &str);
}

impl<F> ProgressSink for F
where
    F: Fn(f32, &str) + Send + Sync,
{
    fn report(&self, fraction: f32, message: &str) {
        self(fraction, message)
    }
}

/// Discards every report
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn report(&self, _fraction: f32, _message: &str) {}
}


#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_closure_is_a_sink() {
        let count = AtomicUsize::new(0);
        let sink = |_f: f32, _m: &str| {
            count.fetch_add(1, Ordering::SeqCst);
        };
        sink.report(0.5, "halfway");
        (&sink as &dyn ProgressSink).report(1.0, "done");
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_recording_sink() {
        let sink = testing::RecordingProgress::default();
        sink.report(0.03, "start");
        NoProgress.report(0.5, "ignored");
        assert_eq!(sink.reports(), vec![(0.03, "start".to_string())]);
    }
}
