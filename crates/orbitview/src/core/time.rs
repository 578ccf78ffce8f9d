/// Converts host-supplied monotonic time into simulation seconds.
/// Samples earlier than the last accepted one are clamped, so simulation
/// time never runs backwards.
#[derive(Debug, Clone, Default)]
pub struct ElapsedClock {
    last_nanos: u64,
}

impl ElapsedClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept a nanosecond sample and return elapsed seconds.
    pub fn advance(&mut self, nanos: u64) -> f64 {
        self.last_nanos = self.last_nanos.max(nanos);
        self.seconds()
    }

    /// Accept a millisecond sample (browser `performance.now()` style).
    pub fn advance_millis(&mut self, millis: f64) -> f64 {
        self.advance(millis_to_nanos(millis))
    }

    pub fn seconds(&self) -> f64 {
        self.last_nanos as f64 / 1_000_000_000.0
    }

    pub fn nanos(&self) -> u64 {
        self.last_nanos
    }
}

/// `performance.now()` style milliseconds to nanoseconds. Negative and
/// non-finite samples map to zero.
pub fn millis_to_nanos(ms: f64) -> u64 {
    if ms.is_finite() && ms > 0.0 {
        (ms * 1_000_000.0) as u64
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_nanos_to_seconds() {
        let mut clock = ElapsedClock::new();
        assert_eq!(clock.advance(1_500_000_000), 1.5);
    }

    #[test]
    fn never_runs_backwards() {
        let mut clock = ElapsedClock::new();
        clock.advance(2_000_000_000);
        assert_eq!(clock.advance(1_000_000_000), 2.0);
        assert_eq!(clock.nanos(), 2_000_000_000);
    }

    #[test]
    fn millis_input() {
        let mut clock = ElapsedClock::new();
        assert!((clock.advance_millis(250.0) - 0.25).abs() < 1e-9);
        assert!((clock.advance_millis(f64::NAN) - 0.25).abs() < 1e-9);
        assert!((clock.advance_millis(-10.0) - 0.25).abs() < 1e-9);
    }

    #[test]
    fn millis_conversion() {
        assert_eq!(millis_to_nanos(16.5), 16_500_000);
        assert_eq!(millis_to_nanos(-3.0), 0);
        assert_eq!(millis_to_nanos(f64::NAN), 0);
        assert_eq!(millis_to_nanos(f64::INFINITY), 0);
    }
}
