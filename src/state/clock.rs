//! Game clock and shot clock of a live game.
//!
//! The controller is pure: tickers and persistence live in [`crate::state::live`].

/// Upper bound of the shot clock display.
pub const SHOT_CLOCK_MAX: u8 = 99;

/// Which of the two clocks a tick or action targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClockKind {
    /// Elapsed game time, counting up.
    Game,
    /// Shot clock, counting down.
    Shot,
}

/// Result of a shot-clock tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShotTick {
    /// The clock was stopped, the tick was stale.
    Ignored,
    /// One second was taken off.
    Counted,
    /// The clock hit zero, stopped and was reset.
    Expired,
}

/// Two independent clocks: elapsed game time counting up, shot clock counting down.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DualClock {
    game_time: u32,
    game_running: bool,
    shot_clock_time: u8,
    shot_running: bool,
    has_shot_clock: bool,
    shot_clock_reset: u8,
}

impl DualClock {
    /// Build a controller from persisted values, clamping the shot clock into range.
    pub fn new(
        game_time: u32,
        game_running: bool,
        shot_clock_time: u8,
        shot_running: bool,
        has_shot_clock: bool,
        shot_clock_reset: u8,
    ) -> Self {
        Self {
            game_time,
            game_running,
            shot_clock_time: shot_clock_time.min(SHOT_CLOCK_MAX),
            shot_running: shot_running && has_shot_clock,
            has_shot_clock,
            shot_clock_reset: shot_clock_reset.min(SHOT_CLOCK_MAX),
        }
    }

    /// Elapsed game time in seconds.
    pub fn game_time(&self) -> u32 {
        self.game_time
    }

    /// Seconds left on the shot clock.
    pub fn shot_clock_time(&self) -> u8 {
        self.shot_clock_time
    }

    /// Whether the game clock is counting.
    pub fn is_game_clock_running(&self) -> bool {
        self.game_running
    }

    /// Whether the shot clock is counting.
    pub fn is_shot_clock_running(&self) -> bool {
        self.shot_running
    }

    /// Whether the sport uses a shot clock at all.
    pub fn has_shot_clock(&self) -> bool {
        self.has_shot_clock
    }

    /// Running flag of either clock.
    pub fn is_running(&self, kind: ClockKind) -> bool {
        match kind {
            ClockKind::Game => self.game_running,
            ClockKind::Shot => self.shot_running,
        }
    }

    /// Start or stop the game clock.
    pub fn toggle_game_clock(&mut self) {
        self.game_running = !self.game_running;
    }

    /// Flip the shot clock. Returns `false` when the sport has no shot clock.
    pub fn toggle_shot_clock(&mut self) -> bool {
        if !self.has_shot_clock {
            return false;
        }
        self.shot_running = !self.shot_running;
        true
    }

    /// Count one second of game time. Returns `false` for a stale tick.
    pub fn tick_game_clock(&mut self) -> bool {
        if !self.game_running {
            return false;
        }
        self.game_time = self.game_time.saturating_add(1);
        true
    }

    /// Count one second off the shot clock, resetting it at zero.
    pub fn tick_shot_clock(&mut self) -> ShotTick {
        if !self.shot_running {
            return ShotTick::Ignored;
        }
        self.shot_clock_time = self.shot_clock_time.saturating_sub(1);
        if self.shot_clock_time == 0 {
            self.shot_running = false;
            self.shot_clock_time = self.shot_clock_reset;
            return ShotTick::Expired;
        }
        ShotTick::Counted
    }

    /// Shift the game time by whole minutes, never below zero.
    pub fn adjust_game_time(&mut self, delta_minutes: i64) {
        let seconds = i64::from(self.game_time).saturating_add(delta_minutes.saturating_mul(60));
        self.game_time = seconds.clamp(0, i64::from(u32::MAX)) as u32;
    }

    /// Shift the shot clock by seconds within `0..=99`. Returns `false` without a shot clock.
    pub fn adjust_shot_clock(&mut self, delta_seconds: i64) -> bool {
        if !self.has_shot_clock {
            return false;
        }
        let seconds = i64::from(self.shot_clock_time).saturating_add(delta_seconds);
        self.shot_clock_time = seconds.clamp(0, i64::from(SHOT_CLOCK_MAX)) as u8;
        true
    }

    /// Stop both clocks without touching their values.
    pub fn stop_all(&mut self) {
        self.game_running = false;
        self.shot_running = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn basketball() -> DualClock {
        DualClock::new(0, false, 24, false, true, 24)
    }

    #[test]
    fn shot_clock_expires_after_twenty_four_ticks() {
        let mut clock = basketball();
        assert!(clock.toggle_shot_clock());

        for expected in (1..24).rev() {
            assert_eq!(clock.tick_shot_clock(), ShotTick::Counted);
            assert_eq!(clock.shot_clock_time(), expected);
        }
        assert_eq!(clock.tick_shot_clock(), ShotTick::Expired);
        assert_eq!(clock.shot_clock_time(), 24);
        assert!(!clock.is_shot_clock_running());

        // Stale ticks after expiry change nothing.
        assert_eq!(clock.tick_shot_clock(), ShotTick::Ignored);
        assert_eq!(clock.shot_clock_time(), 24);
    }

    #[test]
    fn game_clock_counts_only_while_running() {
        let mut clock = basketball();
        assert!(!clock.tick_game_clock());
        clock.toggle_game_clock();
        for _ in 0..5 {
            assert!(clock.tick_game_clock());
        }
        assert_eq!(clock.game_time(), 5);
        clock.toggle_game_clock();
        assert!(!clock.tick_game_clock());
        assert_eq!(clock.game_time(), 5);
    }

    #[test]
    fn shot_clock_adjustments_are_clamped() {
        let mut clock = basketball();
        assert!(clock.adjust_shot_clock(200));
        assert_eq!(clock.shot_clock_time(), SHOT_CLOCK_MAX);
        assert!(clock.adjust_shot_clock(-500));
        assert_eq!(clock.shot_clock_time(), 0);
        assert!(clock.adjust_shot_clock(5));
        assert_eq!(clock.shot_clock_time(), 5);
    }

    #[test]
    fn game_time_adjustments_floor_at_zero() {
        let mut clock = basketball();
        clock.adjust_game_time(2);
        assert_eq!(clock.game_time(), 120);
        clock.adjust_game_time(-1);
        assert_eq!(clock.game_time(), 60);
        clock.adjust_game_time(-5);
        assert_eq!(clock.game_time(), 0);
    }

    #[test]
    fn sports_without_shot_clock_ignore_shot_actions() {
        let mut clock = DualClock::new(30, true, 0, true, false, 0);
        assert!(!clock.is_shot_clock_running());
        assert!(!clock.toggle_shot_clock());
        assert!(!clock.adjust_shot_clock(10));
        assert_eq!(clock.tick_shot_clock(), ShotTick::Ignored);
        assert_eq!(clock.shot_clock_time(), 0);
    }

    #[test]
    fn shot_clock_never_goes_negative() {
        let mut clock = DualClock::new(0, false, 1, true, true, 24);
        assert_eq!(clock.tick_shot_clock(), ShotTick::Expired);
        let mut clock = DualClock::new(0, false, 0, true, true, 24);
        assert_eq!(clock.tick_shot_clock(), ShotTick::Expired);
        assert_eq!(clock.shot_clock_time(), 24);
    }
}
