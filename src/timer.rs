use crate::utils::time::format_clock;

/// Stopwatch counting whole seconds. The counter only moves through [Timer::tick], which the
/// session loop fires once per second while the timer is running, so elapsed time is always an
/// exact count of delivered ticks.
#[derive(Debug, Default)]
pub struct Timer {
    elapsed_seconds: u64,
    running: bool,
}

impl Timer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn elapsed_seconds(&self) -> u64 {
        self.elapsed_seconds
    }

    /// The dual-purpose start/pause control: starts the timer when idle, pauses it when running.
    /// Elapsed seconds are retained across a pause. Returns the new running state.
    pub fn toggle(&mut self) -> bool {
        self.running = !self.running;
        self.running
    }

    /// Sets the counter back to zero. Refused while the timer is running, the same way the
    /// original control is disabled mid-run. Returns whether the reset happened.
    pub fn reset(&mut self) -> bool {
        if self.running {
            return false;
        }
        self.elapsed_seconds = 0;
        true
    }

    /// Advances the counter by exactly one second. Ignored while paused, so a tick that raced a
    /// pause can never move the counter.
    pub fn tick(&mut self) {
        if self.running {
            self.elapsed_seconds += 1;
        }
    }

    /// The `H:MM:SS` display string for the current counter.
    pub fn display(&self) -> String {
        format_clock(self.elapsed_seconds as i64)
    }
}
