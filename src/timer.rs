// ============================================================================
// timer.rs — Sketchbook
// Wall-clock stopwatch used for restart delays and blink timers.
// ============================================================================

use std::time::Instant;

#[derive(Clone, Debug)]
pub struct ElapsedTimer {
    start: Instant,
}

impl Default for ElapsedTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl ElapsedTimer {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn restart(&mut self) {
        self.start = Instant::now();
    }

    /// Seconds since creation or the last `restart`.
    pub fn elapsed(&self) -> f64 {
        self.start.elapsed().as_secs_f64()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn elapsed_grows_and_restart_resets() {
        let mut timer = ElapsedTimer::new();
        thread::sleep(Duration::from_millis(20));
        let before = timer.elapsed();
        assert!(before >= 0.02);

        timer.restart();
        assert!(timer.elapsed() < before);
    }
}
