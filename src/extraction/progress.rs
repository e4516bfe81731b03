use tokio::sync::watch;

/// Observability-only progress signal for optical recognition.
///
/// Reported values are clamped to `[0, 1]` and never decrease. Emission is
/// best-effort: dropping every receiver must not stall or fail recognition,
/// so reporting into a closed channel is a no-op.
#[derive(Debug, Clone)]
pub struct ProgressReporter {
    tx: watch::Sender<f32>,
}

impl ProgressReporter {
    /// A reporter plus the receiver a caller can watch.
    pub fn channel() -> (Self, watch::Receiver<f32>) {
        let (tx, rx) = watch::channel(0.0);
        (Self { tx }, rx)
    }

    /// A reporter nobody is listening to.
    pub fn disabled() -> Self {
        let (tx, _rx) = watch::channel(0.0);
        Self { tx }
    }

    /// Report a completion fraction. Out-of-range values are clamped and
    /// regressions are ignored, so observers always see a monotonically
    /// non-decreasing sequence.
    pub fn report(&self, fraction: f32) {
        let fraction = if fraction.is_nan() {
            return;
        } else {
            fraction.clamp(0.0, 1.0)
        };

        self.tx.send_if_modified(|current| {
            if fraction > *current {
                *current = fraction;
                true
            } else {
                false
            }
        });
    }

    /// Current value, mostly useful in tests.
    pub fn current(&self) -> f32 {
        *self.tx.borrow()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_are_monotonic() {
        let (reporter, rx) = ProgressReporter::channel();
        reporter.report(0.3);
        assert!((*rx.borrow() - 0.3).abs() < f32::EPSILON);

        // Regression is ignored
        reporter.report(0.1);
        assert!((*rx.borrow() - 0.3).abs() < f32::EPSILON);

        reporter.report(0.9);
        assert!((*rx.borrow() - 0.9).abs() < f32::EPSILON);
    }

    #[test]
    fn values_clamped_to_unit_interval() {
        let (reporter, rx) = ProgressReporter::channel();
        reporter.report(7.5);
        assert!((*rx.borrow() - 1.0).abs() < f32::EPSILON);

        let (reporter, rx) = ProgressReporter::channel();
        reporter.report(-2.0);
        assert!((*rx.borrow() - 0.0).abs() < f32::EPSILON);
    }

    #[test]
    fn nan_is_ignored() {
        let (reporter, rx) = ProgressReporter::channel();
        reporter.report(0.5);
        reporter.report(f32::NAN);
        assert!((*rx.borrow() - 0.5).abs() < f32::EPSILON);
    }

    #[test]
    fn reporting_without_receiver_is_a_noop() {
        let reporter = ProgressReporter::disabled();
        reporter.report(0.4);
        reporter.report(1.0);
        assert!((reporter.current() - 1.0).abs() < f32::EPSILON);
    }
}
