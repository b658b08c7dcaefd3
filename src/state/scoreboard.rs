//! Scoreboard state of one game and the operations of the game page.

use serde::Deserialize;
use thiserror::Error;
use utoipa::ToSchema;

use crate::{
    dao::models::{GameEntity, GamePatch, GameStatus},
    state::{
        clock::{ClockKind, DualClock, ShotTick},
        sport::Sport,
    },
};

/// One of the two sides of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TeamSide {
    /// Home team.
    Team1,
    /// Away team.
    Team2,
}

/// Direction of a period change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PeriodDirection {
    /// Forward, up to the sport's last period.
    Next,
    /// Back, down to the first period.
    Previous,
}

/// Reasons a scoreboard operation is refused.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScoreboardError {
    /// Finished games accept no more changes.
    #[error("game is finished")]
    Finished,
    /// Status change outside the allowed transitions.
    #[error("cannot move game from `{from}` to `{to}`")]
    InvalidTransition {
        /// Current status.
        from: GameStatus,
        /// Requested status.
        to: GameStatus,
    },
}

/// What a clock tick did to the scoreboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The clock was stopped; nothing changed.
    Ignored,
    /// One second was counted.
    Counted,
    /// The shot clock ran out and was reset.
    ShotClockExpired,
}

/// In-memory scoreboard mirroring a persisted [`GameEntity`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scoreboard {
    total_periods: u8,
    team1_score: u32,
    team2_score: u32,
    team1_fouls: u32,
    team2_fouls: u32,
    current_period: u8,
    status: GameStatus,
    clock: DualClock,
}

fn apply_delta(value: u32, delta: i64) -> u32 {
    i64::from(value)
        .saturating_add(delta)
        .clamp(0, i64::from(u32::MAX)) as u32
}

fn changed<T: PartialEq + Copy>(before: T, after: T) -> Option<T> {
    (before != after).then_some(after)
}

impl Scoreboard {
    /// Rebuild the scoreboard of `game` under the rules of `sport`.
    pub fn from_entity(game: &GameEntity, sport: &Sport, shot_clock_reset: u8) -> Self {
        let mut board = Self {
            total_periods: sport.total_periods,
            team1_score: game.team1_score,
            team2_score: game.team2_score,
            team1_fouls: game.team1_fouls,
            team2_fouls: game.team2_fouls,
            current_period: sport.clamp_period(i64::from(game.current_period)),
            status: game.game_status,
            clock: DualClock::new(
                game.game_time,
                game.is_game_clock_running,
                game.shot_clock_time,
                game.is_shot_clock_running,
                sport.has_shot_clock,
                shot_clock_reset,
            ),
        };
        if board.status != GameStatus::Active {
            board.clock.stop_all();
        }
        board
    }

    /// Current game status.
    pub fn status(&self) -> GameStatus {
        self.status
    }

    /// Both clocks.
    pub fn clock(&self) -> &DualClock {
        &self.clock
    }

    /// 1-based period number.
    pub fn current_period(&self) -> u8 {
        self.current_period
    }

    /// Score of one side.
    pub fn score(&self, side: TeamSide) -> u32 {
        match side {
            TeamSide::Team1 => self.team1_score,
            TeamSide::Team2 => self.team2_score,
        }
    }

    /// Fouls of one side.
    pub fn fouls(&self, side: TeamSide) -> u32 {
        match side {
            TeamSide::Team1 => self.team1_fouls,
            TeamSide::Team2 => self.team2_fouls,
        }
    }

    fn ensure_open(&self) -> Result<(), ScoreboardError> {
        if self.status == GameStatus::Finished {
            return Err(ScoreboardError::Finished);
        }
        Ok(())
    }

    /// Add `delta` to a side's score, floored at zero.
    pub fn update_score(&mut self, side: TeamSide, delta: i64) -> Result<(), ScoreboardError> {
        self.ensure_open()?;
        let score = match side {
            TeamSide::Team1 => &mut self.team1_score,
            TeamSide::Team2 => &mut self.team2_score,
        };
        *score = apply_delta(*score, delta);
        Ok(())
    }

    /// Add `delta` to a side's fouls, floored at zero.
    pub fn update_fouls(&mut self, side: TeamSide, delta: i64) -> Result<(), ScoreboardError> {
        self.ensure_open()?;
        let fouls = match side {
            TeamSide::Team1 => &mut self.team1_fouls,
            TeamSide::Team2 => &mut self.team2_fouls,
        };
        *fouls = apply_delta(*fouls, delta);
        Ok(())
    }

    /// Move to the next or previous period. A real change stops both clocks.
    pub fn advance_period(&mut self, direction: PeriodDirection) -> Result<(), ScoreboardError> {
        self.ensure_open()?;
        let target = match direction {
            PeriodDirection::Next => i64::from(self.current_period) + 1,
            PeriodDirection::Previous => i64::from(self.current_period) - 1,
        };
        let target = target.clamp(1, i64::from(self.total_periods)) as u8;
        if target != self.current_period {
            self.current_period = target;
            self.clock.stop_all();
        }
        Ok(())
    }

    /// Move between active and paused, or finish the game.
    ///
    /// Leaving `active` stops both clocks. Setting the current status again is a no-op.
    pub fn set_status(&mut self, target: GameStatus) -> Result<(), ScoreboardError> {
        use GameStatus::{Active, Finished, Paused};

        match (self.status, target) {
            (from, to) if from == to => return Ok(()),
            (Active, Paused) | (Paused, Active) | (Active | Paused, Finished) => {}
            (from, to) => return Err(ScoreboardError::InvalidTransition { from, to }),
        }
        self.status = target;
        if target != Active {
            self.clock.stop_all();
        }
        Ok(())
    }

    /// Flip the game clock. Starting it on a paused game resumes the game.
    pub fn toggle_game_clock(&mut self) -> Result<(), ScoreboardError> {
        self.ensure_open()?;
        if !self.clock.is_game_clock_running() {
            self.resume();
        }
        self.clock.toggle_game_clock();
        Ok(())
    }

    /// Flip the shot clock. Starting it on a paused game resumes the game;
    /// sports without a shot clock are left unchanged.
    pub fn toggle_shot_clock(&mut self) -> Result<(), ScoreboardError> {
        self.ensure_open()?;
        if !self.clock.has_shot_clock() {
            return Ok(());
        }
        if !self.clock.is_shot_clock_running() {
            self.resume();
        }
        self.clock.toggle_shot_clock();
        Ok(())
    }

    fn resume(&mut self) {
        if self.status == GameStatus::Paused {
            self.status = GameStatus::Active;
        }
    }

    /// Move the game clock by whole minutes, floored at zero.
    pub fn adjust_game_time(&mut self, delta_minutes: i64) -> Result<(), ScoreboardError> {
        self.ensure_open()?;
        self.clock.adjust_game_time(delta_minutes);
        Ok(())
    }

    /// Move the shot clock by seconds within `0..=99`.
    pub fn adjust_shot_clock(&mut self, delta_seconds: i64) -> Result<(), ScoreboardError> {
        self.ensure_open()?;
        self.clock.adjust_shot_clock(delta_seconds);
        Ok(())
    }

    /// Count one second on the given clock.
    pub fn tick(&mut self, kind: ClockKind) -> TickOutcome {
        match kind {
            ClockKind::Game if self.clock.tick_game_clock() => TickOutcome::Counted,
            ClockKind::Game => TickOutcome::Ignored,
            ClockKind::Shot => match self.clock.tick_shot_clock() {
                ShotTick::Ignored => TickOutcome::Ignored,
                ShotTick::Counted => TickOutcome::Counted,
                ShotTick::Expired => TickOutcome::ShotClockExpired,
            },
        }
    }

    /// Absolute values of every field that differs from `before`.
    pub fn patch_since(&self, before: &Scoreboard) -> GamePatch {
        GamePatch {
            team1_score: changed(before.team1_score, self.team1_score),
            team2_score: changed(before.team2_score, self.team2_score),
            team1_fouls: changed(before.team1_fouls, self.team1_fouls),
            team2_fouls: changed(before.team2_fouls, self.team2_fouls),
            game_time: changed(before.clock.game_time(), self.clock.game_time()),
            shot_clock_time: changed(before.clock.shot_clock_time(), self.clock.shot_clock_time()),
            is_game_clock_running: changed(
                before.clock.is_game_clock_running(),
                self.clock.is_game_clock_running(),
            ),
            is_shot_clock_running: changed(
                before.clock.is_shot_clock_running(),
                self.clock.is_shot_clock_running(),
            ),
            current_period: changed(before.current_period, self.current_period),
            game_status: changed(before.status, self.status),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{dao::models::Timestamp, state::sport::lookup};

    fn game(sport_id: &str) -> GameEntity {
        let sport = lookup(sport_id).unwrap();
        GameEntity {
            id: "g1".into(),
            user_id: "u1".into(),
            sport_id: sport_id.into(),
            team1_id: "t1".into(),
            team2_id: "t2".into(),
            team1_score: 0,
            team2_score: 0,
            team1_fouls: 0,
            team2_fouls: 0,
            game_time: 0,
            shot_clock_time: sport.shot_clock_seconds,
            is_game_clock_running: false,
            is_shot_clock_running: false,
            current_period: 1,
            game_status: GameStatus::Active,
            created_at: Timestamp::now(),
        }
    }

    fn board(sport_id: &str) -> Scoreboard {
        let sport = lookup(sport_id).unwrap();
        Scoreboard::from_entity(&game(sport_id), sport, sport.shot_clock_seconds)
    }

    #[test]
    fn scores_and_fouls_never_go_negative() {
        let mut board = board("basketball");
        board.update_score(TeamSide::Team1, 3).unwrap();
        board.update_score(TeamSide::Team1, -10).unwrap();
        assert_eq!(board.score(TeamSide::Team1), 0);

        board.update_fouls(TeamSide::Team2, -1).unwrap();
        assert_eq!(board.fouls(TeamSide::Team2), 0);
        board.update_fouls(TeamSide::Team2, 2).unwrap();
        assert_eq!(board.fouls(TeamSide::Team2), 2);
    }

    #[test]
    fn period_stays_in_bounds_and_stops_clocks_on_change() {
        let mut board = board("soccer");
        board.toggle_game_clock().unwrap();
        board.advance_period(PeriodDirection::Previous).unwrap();
        assert_eq!(board.current_period(), 1);
        assert!(board.clock().is_game_clock_running());

        board.advance_period(PeriodDirection::Next).unwrap();
        assert_eq!(board.current_period(), 2);
        assert!(!board.clock().is_game_clock_running());

        // Upper-bound no-op leaves a restarted clock alone.
        board.toggle_game_clock().unwrap();
        board.advance_period(PeriodDirection::Next).unwrap();
        assert_eq!(board.current_period(), 2);
        assert!(board.clock().is_game_clock_running());
    }

    #[test]
    fn status_transitions() {
        let mut board = board("basketball");
        board.toggle_game_clock().unwrap();
        board.toggle_shot_clock().unwrap();

        board.set_status(GameStatus::Paused).unwrap();
        assert!(!board.clock().is_game_clock_running());
        assert!(!board.clock().is_shot_clock_running());

        board.set_status(GameStatus::Paused).unwrap();
        board.set_status(GameStatus::Active).unwrap();
        board.set_status(GameStatus::Finished).unwrap();
        assert_eq!(
            board.set_status(GameStatus::Active),
            Err(ScoreboardError::InvalidTransition {
                from: GameStatus::Finished,
                to: GameStatus::Active,
            })
        );
        assert_eq!(board.set_status(GameStatus::Finished), Ok(()));
        assert_eq!(
            board.update_score(TeamSide::Team1, 1),
            Err(ScoreboardError::Finished)
        );
    }

    #[test]
    fn starting_a_clock_resumes_a_paused_game() {
        let mut board = board("basketball");
        board.set_status(GameStatus::Paused).unwrap();
        let paused = board.clone();

        board.toggle_game_clock().unwrap();
        assert!(board.clock().is_game_clock_running());
        assert_eq!(board.status(), GameStatus::Active);
        let patch = board.patch_since(&paused);
        assert_eq!(patch.game_status, Some(GameStatus::Active));
        assert_eq!(patch.is_game_clock_running, Some(true));

        board.set_status(GameStatus::Paused).unwrap();
        board.toggle_shot_clock().unwrap();
        assert!(board.clock().is_shot_clock_running());
        assert_eq!(board.status(), GameStatus::Active);
    }

    #[test]
    fn shot_clock_toggle_without_shot_clock_keeps_the_game_paused() {
        let mut board = board("soccer");
        board.set_status(GameStatus::Paused).unwrap();
        let before = board.clone();
        board.toggle_shot_clock().unwrap();
        assert!(board.patch_since(&before).is_empty());
    }

    #[test]
    fn finished_games_refuse_clock_toggles() {
        let mut board = board("basketball");
        board.set_status(GameStatus::Finished).unwrap();
        assert_eq!(board.toggle_game_clock(), Err(ScoreboardError::Finished));
        assert_eq!(board.toggle_shot_clock(), Err(ScoreboardError::Finished));
    }

    #[test]
    fn periods_stay_in_bounds_for_every_sport() {
        use PeriodDirection::{Next, Previous};

        for sport in crate::state::sport::all() {
            let mut board = board(sport.id);
            let total = usize::from(sport.total_periods);
            let steps = std::iter::repeat_n(Next, total + 2)
                .chain(std::iter::repeat_n(Previous, total + 2))
                .chain([Next, Previous, Previous, Next, Next]);
            for direction in steps {
                board.advance_period(direction).unwrap();
                let period = board.current_period();
                assert!(
                    (1..=sport.total_periods).contains(&period),
                    "{}: period {period}",
                    sport.id
                );
            }
            assert_eq!(board.current_period(), 3.min(sport.total_periods));
        }
    }

    #[test]
    fn last_quarter_next_keeps_running_clocks() {
        let mut board = board("basketball");
        for _ in 0..3 {
            board.advance_period(PeriodDirection::Next).unwrap();
        }
        assert_eq!(board.current_period(), 4);

        board.toggle_game_clock().unwrap();
        board.toggle_shot_clock().unwrap();
        let before = board.clone();
        board.advance_period(PeriodDirection::Next).unwrap();

        assert_eq!(board.current_period(), 4);
        assert!(board.clock().is_game_clock_running());
        assert!(board.clock().is_shot_clock_running());
        assert!(board.patch_since(&before).is_empty());
    }

    #[test]
    fn patch_contains_only_changed_fields() {
        let before = board("basketball");
        let mut after = before.clone();
        assert!(after.patch_since(&before).is_empty());

        after.update_score(TeamSide::Team2, 2).unwrap();
        after.toggle_shot_clock().unwrap();
        let patch = after.patch_since(&before);
        assert_eq!(
            patch,
            GamePatch {
                team2_score: Some(2),
                is_shot_clock_running: Some(true),
                ..GamePatch::default()
            }
        );
    }

    #[test]
    fn shot_clock_expiry_through_ticks() {
        let mut board = board("basketball");
        board.toggle_shot_clock().unwrap();
        let mut outcome = TickOutcome::Ignored;
        for _ in 0..24 {
            outcome = board.tick(ClockKind::Shot);
        }
        assert_eq!(outcome, TickOutcome::ShotClockExpired);
        assert_eq!(board.clock().shot_clock_time(), 24);
        assert!(!board.clock().is_shot_clock_running());
    }
}
