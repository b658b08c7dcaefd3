//! Team creation and lookups, scoped to the signed-in user.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::{
    dao::{
        models::{PlayerEntity, TeamEntity, Timestamp},
        record_store::{Direction, ListQuery, RecordStore},
        repository::Repository,
    },
    dto::{
        players::{NewPlayerInput, PlayerSummary},
        teams::{CreateTeamRequest, TeamDetail, TeamSummary},
    },
    error::ServiceError,
    state::SharedState,
};

/// Create a team and its initial roster.
pub async fn create_team(
    state: &SharedState,
    user_id: &str,
    request: CreateTeamRequest,
) -> Result<TeamDetail, ServiceError> {
    let store = state.require_store().await?;
    let CreateTeamRequest {
        name,
        color,
        sport,
        players,
    } = request;

    let team = insert_team(state, store.clone(), user_id, &name, color, sport).await?;

    let roster = players
        .into_iter()
        .map(|input| new_player(user_id, &team.id, input))
        .collect::<Vec<_>>();
    let roster = if roster.is_empty() {
        roster
    } else {
        Repository::<PlayerEntity>::new(store)
            .create_many(&roster)
            .await?
    };

    info!(team_id = %team.id, players = roster.len(), "team created");
    Ok(TeamDetail {
        team: (&team).into(),
        players: roster.iter().map(Into::into).collect(),
    })
}

/// Teams of the user, newest first.
pub async fn list_teams(
    state: &SharedState,
    user_id: &str,
) -> Result<Vec<TeamSummary>, ServiceError> {
    let store = state.require_store().await?;
    let teams = user_teams(store, user_id).await?;
    Ok(teams.iter().map(Into::into).collect())
}

/// Team with its players, oldest first.
pub async fn get_team(
    state: &SharedState,
    user_id: &str,
    team_id: &str,
) -> Result<TeamDetail, ServiceError> {
    let store = state.require_store().await?;
    let team = owned_team(store.clone(), user_id, team_id).await?;
    let players = team_players(store, &team.id).await?;

    Ok(TeamDetail {
        team: (&team).into(),
        players: players.iter().map(Into::into).collect(),
    })
}

/// Add a player to one of the user's teams.
pub async fn add_player(
    state: &SharedState,
    user_id: &str,
    team_id: &str,
    input: NewPlayerInput,
) -> Result<PlayerSummary, ServiceError> {
    let store = state.require_store().await?;
    let team = owned_team(store.clone(), user_id, team_id).await?;

    let player = Repository::<PlayerEntity>::new(store)
        .create(&new_player(user_id, &team.id, input))
        .await?;
    info!(player_id = %player.id, team_id = %team.id, "player created");
    Ok((&player).into())
}

/// Persist a new team, picking the first palette color unused by the user when none is given.
pub(crate) async fn insert_team(
    state: &SharedState,
    store: Arc<dyn RecordStore>,
    user_id: &str,
    name: &str,
    color: Option<String>,
    sport: Option<String>,
) -> Result<TeamEntity, ServiceError> {
    let color = match color {
        Some(color) => color,
        None => {
            let used = Repository::<TeamEntity>::new(store.clone())
                .list(ListQuery::new().filter("user_id", user_id))
                .await?
                .into_iter()
                .map(|team| team.color)
                .collect::<Vec<_>>();
            state.config().first_unused_color(&used)
        }
    };

    let team = TeamEntity {
        id: Uuid::new_v4().to_string(),
        name: name.trim().to_owned(),
        color,
        sport,
        user_id: user_id.to_owned(),
        created_at: Timestamp::now(),
    };
    Ok(Repository::<TeamEntity>::new(store).create(&team).await?)
}

pub(crate) async fn owned_team(
    store: Arc<dyn RecordStore>,
    user_id: &str,
    team_id: &str,
) -> Result<TeamEntity, ServiceError> {
    Repository::<TeamEntity>::new(store)
        .get_owned(team_id, user_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("team `{team_id}` not found")))
}

pub(crate) async fn user_teams(
    store: Arc<dyn RecordStore>,
    user_id: &str,
) -> Result<Vec<TeamEntity>, ServiceError> {
    Ok(Repository::<TeamEntity>::new(store)
        .list(
            ListQuery::new()
                .filter("user_id", user_id)
                .order_by("created_at", Direction::Desc),
        )
        .await?)
}

pub(crate) async fn team_players(
    store: Arc<dyn RecordStore>,
    team_id: &str,
) -> Result<Vec<PlayerEntity>, ServiceError> {
    Ok(Repository::<PlayerEntity>::new(store)
        .list(
            ListQuery::new()
                .filter("team_id", team_id)
                .order_by("created_at", Direction::Asc),
        )
        .await?)
}

pub(crate) fn new_player(user_id: &str, team_id: &str, input: NewPlayerInput) -> PlayerEntity {
    PlayerEntity {
        id: Uuid::new_v4().to_string(),
        name: input.name.trim().to_owned(),
        team_id: team_id.to_owned(),
        position: input
            .position
            .map(|position| position.trim().to_owned())
            .filter(|position| !position.is_empty()),
        jersey_number: input.jersey_number,
        user_id: user_id.to_owned(),
        created_at: Timestamp::now(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::AppConfig, dao::record_store::memory::MemoryRecordStore, state::AppState};

    async fn state() -> SharedState {
        let state = AppState::new(AppConfig::default());
        state.set_record_store(Arc::new(MemoryRecordStore::new())).await;
        state
    }

    fn request(name: &str, color: Option<&str>) -> CreateTeamRequest {
        CreateTeamRequest {
            name: name.into(),
            color: color.map(Into::into),
            sport: None,
            players: Vec::new(),
        }
    }

    #[tokio::test]
    async fn palette_skips_colors_already_used_by_the_user() {
        let state = state().await;
        let first = create_team(&state, "alice", request("A", None)).await.unwrap();
        let second = create_team(&state, "alice", request("B", None)).await.unwrap();
        let other_user = create_team(&state, "bob", request("C", None)).await.unwrap();

        assert_eq!(first.team.color, "#3B82F6");
        assert_eq!(second.team.color, "#EF4444");
        assert_eq!(other_user.team.color, "#3B82F6");
    }

    #[tokio::test]
    async fn roster_is_created_with_the_team() {
        let state = state().await;
        let mut req = request("Hawks", Some("#000000"));
        req.players = vec![
            NewPlayerInput {
                name: " Ann ".into(),
                position: Some("guard".into()),
                jersey_number: Some(7),
            },
            NewPlayerInput {
                name: "Ben".into(),
                position: Some("  ".into()),
                jersey_number: None,
            },
        ];
        let created = create_team(&state, "alice", req).await.unwrap();
        assert_eq!(created.players.len(), 2);
        assert_eq!(created.players[0].name, "Ann");
        assert_eq!(created.players[1].position, None);

        let detail = get_team(&state, "alice", &created.team.id).await.unwrap();
        assert_eq!(detail.players.len(), 2);
        assert!(matches!(
            get_team(&state, "bob", &created.team.id).await,
            Err(ServiceError::NotFound(_))
        ));
    }
}
