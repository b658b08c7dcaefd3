//! Live game actor: the single writer of one game's scoreboard.
//!
//! User actions and clock ticks travel through the same channel, so every
//! mutation and every store write for a game happens in order. The actor
//! keeps the last committed record; a failed write leaves it untouched.

use std::{
    sync::{
        Arc, Weak,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};

use tokio::{
    sync::{mpsc, oneshot},
    task::JoinHandle,
    time::{self, Instant, MissedTickBehavior},
};
use tracing::{debug, info, warn};

use crate::{
    dao::{
        models::{GameEntity, GamePatch, GameStatus},
        repository::Repository,
    },
    error::ServiceError,
    services::sse_events,
    state::{
        AppState, SharedState, SseHub,
        clock::ClockKind,
        scoreboard::{PeriodDirection, Scoreboard, ScoreboardError, TeamSide, TickOutcome},
        sport::Sport,
    },
};

const TICK_PERIOD: Duration = Duration::from_secs(1);
const COMMAND_BUFFER: usize = 64;
const EVENT_BUFFER: usize = 32;
/// Quiet period after which a game without running clocks or viewers leaves the registry.
pub const IDLE_TIMEOUT: Duration = Duration::from_secs(300);

static NEXT_INSTANCE: AtomicU64 = AtomicU64::new(1);

/// User action on a live game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameAction {
    /// Start or stop the game clock.
    ToggleGameClock,
    /// Start or stop the shot clock.
    ToggleShotClock,
    /// Move the game clock.
    AdjustGameTime {
        /// Whole minutes, may be negative.
        minutes: i64,
    },
    /// Move the shot clock.
    AdjustShotClock {
        /// Seconds, may be negative.
        seconds: i64,
    },
    /// Change a team's score.
    Score {
        /// Side to change.
        team: TeamSide,
        /// Points to add, may be negative.
        delta: i64,
    },
    /// Change a team's fouls.
    Fouls {
        /// Side to change.
        team: TeamSide,
        /// Fouls to add, may be negative.
        delta: i64,
    },
    /// Move to another period.
    Period(PeriodDirection),
    /// Change the game status.
    Status(GameStatus),
}

impl GameAction {
    fn apply_to(self, board: &mut Scoreboard) -> Result<(), ScoreboardError> {
        match self {
            GameAction::ToggleGameClock => board.toggle_game_clock(),
            GameAction::ToggleShotClock => board.toggle_shot_clock(),
            GameAction::AdjustGameTime { minutes } => board.adjust_game_time(minutes),
            GameAction::AdjustShotClock { seconds } => board.adjust_shot_clock(seconds),
            GameAction::Score { team, delta } => board.update_score(team, delta),
            GameAction::Fouls { team, delta } => board.update_fouls(team, delta),
            GameAction::Period(direction) => board.advance_period(direction),
            GameAction::Status(status) => board.set_status(status),
        }
    }
}

enum Command {
    Apply {
        action: GameAction,
        reply: oneshot::Sender<Result<GameEntity, ServiceError>>,
    },
    Tick {
        kind: ClockKind,
        generation: u64,
    },
    Snapshot {
        reply: oneshot::Sender<GameEntity>,
    },
}

/// Cloneable handle to a running live game.
#[derive(Clone)]
pub struct LiveGameHandle {
    instance: u64,
    owner: Arc<str>,
    commands: mpsc::Sender<Command>,
    events: Arc<SseHub>,
}

impl LiveGameHandle {
    /// Start the actor for `game`, resuming any clock persisted as running.
    pub fn spawn(state: &SharedState, game: GameEntity, sport: &'static Sport) -> Self {
        let (commands, receiver) = mpsc::channel(COMMAND_BUFFER);
        let events = Arc::new(SseHub::new(EVENT_BUFFER));
        let shot_clock_reset = state.config().shot_clock_seconds(sport);
        let board = Scoreboard::from_entity(&game, sport, shot_clock_reset);
        let instance = NEXT_INSTANCE.fetch_add(1, Ordering::Relaxed);

        let handle = Self {
            instance,
            owner: Arc::from(game.user_id.as_str()),
            commands: commands.clone(),
            events: events.clone(),
        };

        info!(game_id = %game.id, sport = sport.id, "starting live game");
        let mut actor = LiveGame {
            instance,
            registered: true,
            last_activity: Instant::now(),
            state: Arc::downgrade(state),
            sport,
            shot_clock_reset,
            committed: game,
            board,
            commands: commands.downgrade(),
            events,
            game_ticker: None,
            shot_ticker: None,
            generation: 0,
        };
        tokio::spawn(async move {
            actor.sync_tickers();
            actor.run(receiver).await;
        });

        handle
    }

    /// User owning the game.
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Hub carrying this game's SSE events.
    pub fn events(&self) -> &SseHub {
        &self.events
    }

    /// Run an action against the committed state and persist the result.
    pub async fn apply(&self, action: GameAction) -> Result<GameEntity, ServiceError> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(Command::Apply { action, reply })
            .await
            .map_err(|_| stopped())?;
        response.await.map_err(|_| stopped())?
    }

    /// Last committed record.
    pub async fn snapshot(&self) -> Result<GameEntity, ServiceError> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(Command::Snapshot { reply })
            .await
            .map_err(|_| stopped())?;
        response.await.map_err(|_| stopped())
    }
}

fn stopped() -> ServiceError {
    ServiceError::Internal("live game stopped".into())
}

struct Ticker {
    handle: JoinHandle<()>,
    generation: u64,
}

struct LiveGame {
    instance: u64,
    registered: bool,
    last_activity: Instant,
    state: Weak<AppState>,
    sport: &'static Sport,
    shot_clock_reset: u8,
    committed: GameEntity,
    board: Scoreboard,
    commands: mpsc::WeakSender<Command>,
    events: Arc<SseHub>,
    game_ticker: Option<Ticker>,
    shot_ticker: Option<Ticker>,
    generation: u64,
}

impl LiveGame {
    /// Process commands until every handle is dropped.
    ///
    /// Leaving the registry drops its handle, so the loop ends once in-flight
    /// requests holding a clone are done.
    async fn run(mut self, mut receiver: mpsc::Receiver<Command>) {
        loop {
            let command = if self.registered {
                tokio::select! {
                    command = receiver.recv() => command,
                    _ = time::sleep_until(self.last_activity + IDLE_TIMEOUT) => {
                        self.evict_if_idle();
                        continue;
                    }
                }
            } else {
                receiver.recv().await
            };
            let Some(command) = command else {
                break;
            };

            match command {
                Command::Apply { action, reply } => {
                    self.last_activity = Instant::now();
                    let result = self.apply(action).await;
                    let _ = reply.send(result);
                }
                Command::Tick { kind, generation } => self.tick(kind, generation).await,
                Command::Snapshot { reply } => {
                    self.last_activity = Instant::now();
                    let _ = reply.send(self.committed.clone());
                }
            }
        }

        self.stop_ticker(ClockKind::Game);
        self.stop_ticker(ClockKind::Shot);
        debug!(game_id = %self.committed.id, "live game stopped");
    }

    async fn apply(&mut self, action: GameAction) -> Result<GameEntity, ServiceError> {
        let mut candidate = self.board.clone();
        action.apply_to(&mut candidate)?;
        self.commit(candidate).await
    }

    async fn tick(&mut self, kind: ClockKind, generation: u64) {
        let current = self
            .ticker(kind)
            .as_ref()
            .is_some_and(|ticker| ticker.generation == generation);
        if !current || !self.board.clock().is_running(kind) {
            return;
        }

        let mut candidate = self.board.clone();
        let outcome = candidate.tick(kind);
        if outcome == TickOutcome::Ignored {
            return;
        }

        if self.commit(candidate).await.is_ok() && outcome == TickOutcome::ShotClockExpired {
            info!(game_id = %self.committed.id, "shot clock expired");
            sse_events::broadcast_shot_clock_expired(&self.events, &self.committed);
        }
    }

    /// Persist the difference between `candidate` and the committed state.
    async fn commit(&mut self, candidate: Scoreboard) -> Result<GameEntity, ServiceError> {
        let patch = candidate.patch_since(&self.board);
        if patch.is_empty() {
            return Ok(self.committed.clone());
        }

        match self.write(&patch).await {
            Ok(stored) => {
                self.install(stored);
                sse_events::broadcast_game_updated(&self.events, &self.committed);
                Ok(self.committed.clone())
            }
            Err(err) => {
                warn!(game_id = %self.committed.id, error = %err, "failed to persist game update");
                sse_events::broadcast_write_failed(
                    &self.events,
                    &self.committed.id,
                    &err.to_string(),
                );
                Err(err)
            }
        }
    }

    async fn write(&self, patch: &GamePatch) -> Result<GameEntity, ServiceError> {
        let state = self
            .state
            .upgrade()
            .ok_or_else(|| ServiceError::Internal("application state dropped".into()))?;
        let store = state.require_store().await?;
        Repository::<GameEntity>::new(store)
            .update(&self.committed.id, patch)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("game `{}`", self.committed.id)))
    }

    /// Adopt the canonical stored record as the committed state.
    fn install(&mut self, stored: GameEntity) {
        self.board = Scoreboard::from_entity(&stored, self.sport, self.shot_clock_reset);
        self.committed = stored;
        self.sync_tickers();
        if self.committed.game_status == GameStatus::Finished {
            self.unregister("finished");
        }
    }

    fn evict_if_idle(&mut self) {
        let clocks_running = self.board.clock().is_game_clock_running()
            || self.board.clock().is_shot_clock_running();
        if clocks_running || self.events.subscriber_count() > 0 {
            self.last_activity = Instant::now();
            return;
        }
        self.unregister("idle");
    }

    /// Remove this actor from the registry, leaving any newer actor of the game in place.
    fn unregister(&mut self, reason: &'static str) {
        if !self.registered {
            return;
        }
        self.registered = false;
        if let Some(state) = self.state.upgrade() {
            let instance = self.instance;
            state
                .live_games()
                .remove_if(&self.committed.id, |_, live| live.instance == instance);
        }
        debug!(game_id = %self.committed.id, reason, "live game left the registry");
    }

    fn ticker(&mut self, kind: ClockKind) -> &mut Option<Ticker> {
        match kind {
            ClockKind::Game => &mut self.game_ticker,
            ClockKind::Shot => &mut self.shot_ticker,
        }
    }

    /// Run a ticker exactly for the clocks flagged as running.
    fn sync_tickers(&mut self) {
        for kind in [ClockKind::Game, ClockKind::Shot] {
            let running = self.board.clock().is_running(kind);
            let active = self.ticker(kind).is_some();
            if running && !active {
                self.start_ticker(kind);
            } else if !running && active {
                self.stop_ticker(kind);
            }
        }
    }

    fn start_ticker(&mut self, kind: ClockKind) {
        self.generation += 1;
        let generation = self.generation;
        let commands = self.commands.clone();

        let handle = tokio::spawn(async move {
            let mut interval = time::interval_at(Instant::now() + TICK_PERIOD, TICK_PERIOD);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                let Some(commands) = commands.upgrade() else {
                    break;
                };
                if commands
                    .send(Command::Tick { kind, generation })
                    .await
                    .is_err()
                {
                    break;
                }
            }
        });

        *self.ticker(kind) = Some(Ticker { handle, generation });
    }

    fn stop_ticker(&mut self, kind: ClockKind) {
        if let Some(ticker) = self.ticker(kind).take() {
            ticker.handle.abort();
        }
    }
}
