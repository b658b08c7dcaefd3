//! Game creation, lookups and live scoreboard controls.
//!
//! Reads go to the record store; every mutation of a game goes through its
//! live actor so that writes for one game are applied in order.

use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use tracing::info;
use uuid::Uuid;

use crate::{
    dao::{
        models::{GameEntity, GameStatus, TeamEntity, Timestamp},
        record_store::{Direction, ListQuery, RecordStore},
        repository::Repository,
    },
    dto::games::{CreateGameRequest, GameDetail, GameListQuery, GameSummary, GameTeamInput},
    error::ServiceError,
    services::team_service,
    state::{LiveGameHandle, SharedState, live::GameAction, sport},
};

const DEFAULT_LIST_LIMIT: usize = 50;

/// Start a new game between two teams, creating teams given by name.
pub async fn create_game(
    state: &SharedState,
    user_id: &str,
    request: CreateGameRequest,
) -> Result<GameDetail, ServiceError> {
    let store = state.require_store().await?;
    let sport = sport::lookup(&request.sport_id).ok_or_else(|| {
        ServiceError::InvalidInput(format!("unknown sport `{}`", request.sport_id))
    })?;

    let team1 = resolve_team(state, store.clone(), user_id, sport.id, request.team1).await?;
    let team2 = resolve_team(state, store.clone(), user_id, sport.id, request.team2).await?;
    if team1.id == team2.id {
        return Err(ServiceError::InvalidInput(
            "a team cannot play against itself".into(),
        ));
    }

    let game = GameEntity {
        id: Uuid::new_v4().to_string(),
        user_id: user_id.to_owned(),
        sport_id: sport.id.to_owned(),
        team1_id: team1.id.clone(),
        team2_id: team2.id.clone(),
        team1_score: 0,
        team2_score: 0,
        team1_fouls: 0,
        team2_fouls: 0,
        game_time: 0,
        shot_clock_time: state.config().shot_clock_seconds(sport),
        is_game_clock_running: false,
        is_shot_clock_running: false,
        current_period: 1,
        game_status: GameStatus::Active,
        created_at: Timestamp::now(),
    };
    let game = Repository::<GameEntity>::new(store).create(&game).await?;
    info!(game_id = %game.id, sport = sport.id, "game created");

    Ok(GameDetail {
        game: (&game).into(),
        sport: sport.into(),
        team1: Some((&team1).into()),
        team2: Some((&team2).into()),
    })
}

async fn resolve_team(
    state: &SharedState,
    store: Arc<dyn RecordStore>,
    user_id: &str,
    sport_id: &str,
    input: GameTeamInput,
) -> Result<TeamEntity, ServiceError> {
    match input {
        GameTeamInput::Existing { team_id } => {
            team_service::owned_team(store, user_id, &team_id).await
        }
        GameTeamInput::New { name } => {
            team_service::insert_team(state, store, user_id, &name, None, Some(sport_id.into()))
                .await
        }
    }
}

/// Games of the user, newest first.
pub async fn list_games(
    state: &SharedState,
    user_id: &str,
    query: GameListQuery,
) -> Result<Vec<GameSummary>, ServiceError> {
    let store = state.require_store().await?;

    let mut list = ListQuery::new().filter("user_id", user_id);
    if let Some(sport_id) = query.sport_id {
        list = list.filter("sport_id", sport_id);
    }
    if let Some(status) = query.status {
        list = list.filter("game_status", status.as_str());
    }
    let list = list
        .order_by("created_at", Direction::Desc)
        .limit(query.limit.unwrap_or(DEFAULT_LIST_LIMIT));

    let games = Repository::<GameEntity>::new(store).list(list).await?;
    Ok(games.iter().map(Into::into).collect())
}

/// Game with its sport rules and both teams; missing teams are reported as `null`.
///
/// A game stored with a running clock, e.g. after a restart, gets its live
/// actor back so the clock keeps ticking, and is reported from that actor.
pub async fn get_game(
    state: &SharedState,
    user_id: &str,
    game_id: &str,
) -> Result<GameDetail, ServiceError> {
    let store = state.require_store().await?;
    let mut game = owned_game(store.clone(), user_id, game_id).await?;
    if game.is_game_clock_running || game.is_shot_clock_running {
        game = live_game(state, user_id, game_id).await?.snapshot().await?;
    }
    let sport = sport::lookup(&game.sport_id).ok_or_else(|| unknown_sport(&game))?;

    let teams = Repository::<TeamEntity>::new(store);
    let team1 = teams.get_owned(&game.team1_id, user_id).await?;
    let team2 = teams.get_owned(&game.team2_id, user_id).await?;

    Ok(GameDetail {
        game: (&game).into(),
        sport: sport.into(),
        team1: team1.as_ref().map(Into::into),
        team2: team2.as_ref().map(Into::into),
    })
}

/// Run a scoreboard action on one of the user's games.
pub async fn apply_action(
    state: &SharedState,
    user_id: &str,
    game_id: &str,
    action: GameAction,
) -> Result<GameSummary, ServiceError> {
    let live = live_game(state, user_id, game_id).await?;
    let game = live.apply(action).await?;
    Ok((&game).into())
}

/// Handle of the live actor for a game, started on first use.
///
/// Games owned by another user are reported as not found.
pub async fn live_game(
    state: &SharedState,
    user_id: &str,
    game_id: &str,
) -> Result<LiveGameHandle, ServiceError> {
    if let Some(live) = state.live_games().get(game_id) {
        return owned_handle(live.value(), user_id, game_id);
    }

    let store = state.require_store().await?;
    let game = owned_game(store, user_id, game_id).await?;
    let sport = sport::lookup(&game.sport_id).ok_or_else(|| unknown_sport(&game))?;

    let live = match state.live_games().entry(game_id.to_owned()) {
        Entry::Occupied(entry) => entry.get().clone(),
        Entry::Vacant(entry) => entry
            .insert(LiveGameHandle::spawn(state, game, sport))
            .clone(),
    };
    owned_handle(&live, user_id, game_id)
}

fn owned_handle(
    live: &LiveGameHandle,
    user_id: &str,
    game_id: &str,
) -> Result<LiveGameHandle, ServiceError> {
    if live.owner() == user_id {
        Ok(live.clone())
    } else {
        Err(game_not_found(game_id))
    }
}

pub(crate) async fn owned_game(
    store: Arc<dyn RecordStore>,
    user_id: &str,
    game_id: &str,
) -> Result<GameEntity, ServiceError> {
    Repository::<GameEntity>::new(store)
        .get_owned(game_id, user_id)
        .await?
        .ok_or_else(|| game_not_found(game_id))
}

fn game_not_found(game_id: &str) -> ServiceError {
    ServiceError::NotFound(format!("game `{game_id}` not found"))
}

fn unknown_sport(game: &GameEntity) -> ServiceError {
    ServiceError::Internal(format!(
        "game `{}` references unknown sport `{}`",
        game.id, game.sport_id
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use crate::{
        config::AppConfig,
        dao::{models::GamePatch, record_store::memory::MemoryRecordStore},
        state::{AppState, live::IDLE_TIMEOUT, scoreboard::TeamSide},
    };

    async fn state() -> SharedState {
        let state = AppState::new(AppConfig::default());
        state.set_record_store(Arc::new(MemoryRecordStore::new())).await;
        state
    }

    fn request(sport_id: &str) -> CreateGameRequest {
        CreateGameRequest {
            sport_id: sport_id.into(),
            team1: GameTeamInput::New {
                name: "Home".into(),
            },
            team2: GameTeamInput::New {
                name: "Away".into(),
            },
        }
    }

    #[tokio::test]
    async fn new_games_start_from_the_sport_defaults() {
        let state = state().await;
        let basketball = create_game(&state, "alice", request("basketball")).await.unwrap();
        assert_eq!(basketball.game.shot_clock_time, 24);
        assert_eq!(basketball.game.current_period, 1);
        assert_eq!(basketball.game.game_status, GameStatus::Active);
        assert!(!basketball.game.is_game_clock_running);
        assert_eq!(basketball.team1.unwrap().color, "#3B82F6");
        assert_eq!(basketball.team2.unwrap().color, "#EF4444");

        let soccer = create_game(&state, "alice", request("soccer")).await.unwrap();
        assert_eq!(soccer.game.shot_clock_time, 0);
    }

    #[tokio::test]
    async fn existing_teams_must_belong_to_the_user() {
        let state = state().await;
        let game = create_game(&state, "alice", request("basketball")).await.unwrap();
        let foreign = CreateGameRequest {
            sport_id: "basketball".into(),
            team1: GameTeamInput::Existing {
                team_id: game.game.team1_id.clone(),
            },
            team2: GameTeamInput::New {
                name: "Mine".into(),
            },
        };
        assert!(matches!(
            create_game(&state, "bob", foreign).await,
            Err(ServiceError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn actions_go_through_the_live_game() {
        let state = state().await;
        let game = create_game(&state, "alice", request("basketball")).await.unwrap();
        let id = game.game.id;

        let updated = apply_action(
            &state,
            "alice",
            &id,
            GameAction::Score {
                team: TeamSide::Team2,
                delta: 3,
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.team2_score, 3);
        assert_eq!(state.live_games().len(), 1);

        let stored = get_game(&state, "alice", &id).await.unwrap();
        assert_eq!(stored.game.team2_score, 3);

        assert!(matches!(
            apply_action(&state, "bob", &id, GameAction::ToggleGameClock).await,
            Err(ServiceError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn finished_games_leave_the_registry() {
        let state = state().await;
        for _ in 0..5 {
            let game = create_game(&state, "alice", request("netball")).await.unwrap();
            apply_action(&state, "alice", &game.game.id, GameAction::ToggleGameClock)
                .await
                .unwrap();
            apply_action(
                &state,
                "alice",
                &game.game.id,
                GameAction::Status(GameStatus::Finished),
            )
            .await
            .unwrap();
        }
        assert!(state.live_games().is_empty());

        let game = create_game(&state, "alice", request("netball")).await.unwrap();
        apply_action(&state, "alice", &game.game.id, GameAction::ToggleGameClock)
            .await
            .unwrap();
        assert_eq!(state.live_games().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn idle_games_without_viewers_are_evicted() {
        let state = state().await;
        let game = create_game(&state, "alice", request("afl")).await.unwrap();
        let id = game.game.id;
        let score = GameAction::Score {
            team: TeamSide::Team1,
            delta: 6,
        };
        apply_action(&state, "alice", &id, score).await.unwrap();
        let viewer = live_game(&state, "alice", &id).await.unwrap().events().subscribe();

        tokio::time::sleep(IDLE_TIMEOUT + Duration::from_secs(1)).await;
        assert_eq!(state.live_games().len(), 1);

        drop(viewer);
        tokio::time::sleep(IDLE_TIMEOUT + Duration::from_secs(1)).await;
        assert!(state.live_games().is_empty());

        // A later action starts a fresh actor from the stored record.
        let updated = apply_action(&state, "alice", &id, score).await.unwrap();
        assert_eq!(updated.team1_score, 12);
    }

    #[tokio::test(start_paused = true)]
    async fn running_clocks_keep_idle_games_registered() {
        let state = state().await;
        let game = create_game(&state, "alice", request("rugby")).await.unwrap();
        let id = game.game.id;
        apply_action(&state, "alice", &id, GameAction::ToggleGameClock)
            .await
            .unwrap();

        tokio::time::sleep(IDLE_TIMEOUT * 2).await;
        assert_eq!(state.live_games().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn reading_a_running_game_resumes_its_clock() {
        let state = state().await;
        let game = create_game(&state, "alice", request("soccer")).await.unwrap();
        let id = game.game.id;

        // Stored as running with no actor, as after a restart.
        let store = state.require_store().await.unwrap();
        let running = GamePatch {
            is_game_clock_running: Some(true),
            ..GamePatch::default()
        };
        Repository::<GameEntity>::new(store)
            .update(&id, &running)
            .await
            .unwrap();
        assert!(state.live_games().is_empty());

        let detail = get_game(&state, "alice", &id).await.unwrap();
        assert!(detail.game.is_game_clock_running);
        assert_eq!(state.live_games().len(), 1);

        tokio::time::sleep(Duration::from_millis(3_500)).await;
        let detail = get_game(&state, "alice", &id).await.unwrap();
        assert_eq!(detail.game.game_time, 3);
    }

    #[tokio::test]
    async fn list_filters_and_orders_newest_first() {
        let state = state().await;
        let first = create_game(&state, "alice", request("basketball")).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        let second = create_game(&state, "alice", request("soccer")).await.unwrap();
        create_game(&state, "bob", request("soccer")).await.unwrap();

        let all = list_games(&state, "alice", GameListQuery::default()).await.unwrap();
        let ids = all.iter().map(|g| g.id.as_str()).collect::<Vec<_>>();
        assert_eq!(ids, vec![second.game.id.as_str(), first.game.id.as_str()]);

        let soccer = list_games(
            &state,
            "alice",
            GameListQuery {
                sport_id: Some("soccer".into()),
                ..GameListQuery::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(soccer.len(), 1);
    }
}
