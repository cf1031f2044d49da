use chrono::{DateTime, Duration, Utc};

use crate::error::PlotterError;

/// The UTC span an observing night covers, sampled at a fixed step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObservationWindow {
    start: DateTime<Utc>,
    stop: DateTime<Utc>,
    step: Duration,
}

impl ObservationWindow {
    pub fn new(
        start: DateTime<Utc>,
        stop: DateTime<Utc>,
        step: Duration,
    ) -> Result<Self, PlotterError> {
        if start >= stop {
            return Err(PlotterError::EmptyWindow {
                start: start.to_string(),
                stop: stop.to_string(),
            });
        }
        if step <= Duration::zero() {
            return Err(PlotterError::ZeroStep);
        }

        Ok(ObservationWindow { start, stop, step })
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn stop(&self) -> DateTime<Utc> {
        self.stop
    }

    pub fn step_minutes(&self) -> u32 {
        self.step.num_minutes().max(1) as u32
    }

    /// Every `start + k * step` short of `stop`, followed by `stop` itself.
    pub fn samples(&self) -> Vec<DateTime<Utc>> {
        let mut samples = vec![];
        let mut t = self.start;
        while t < self.stop {
            samples.push(t);
            t = t + self.step;
        }
        samples.push(self.stop);
        samples
    }
}
