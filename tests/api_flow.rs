use std::sync::Arc;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header},
};
use scoreboard_back::{
    build_router,
    config::AppConfig,
    dao::record_store::memory::MemoryRecordStore,
    state::{AppState, SharedState},
};
use serde_json::{Value, json};
use tower::ServiceExt;

struct TestApp {
    router: Router,
    state: SharedState,
    store: MemoryRecordStore,
}

impl TestApp {
    async fn new() -> Self {
        let state = AppState::new(AppConfig::default());
        let store = MemoryRecordStore::new();
        state.set_record_store(Arc::new(store.clone())).await;
        Self {
            router: build_router(state.clone()),
            state,
            store,
        }
    }

    async fn call(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut request = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            request = request.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => request
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => request.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    async fn sign_in(&self, user_id: &str) -> String {
        let (status, body) = self
            .call(
                Method::POST,
                "/auth/sign-in",
                None,
                Some(json!({ "user_id": user_id })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        body["token"].as_str().unwrap().to_owned()
    }

    async fn new_game(&self, token: &str, sport_id: &str) -> Value {
        let (status, body) = self
            .call(
                Method::POST,
                "/games",
                Some(token),
                Some(json!({
                    "sport_id": sport_id,
                    "team1": { "name": "Home" },
                    "team2": { "name": "Away" },
                })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "{body}");
        body
    }
}

#[tokio::test]
async fn session_lifecycle() {
    let app = TestApp::new().await;

    let (status, body) = app.call(Method::GET, "/auth/me", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "user_id": null, "is_loading": false }));

    let token = app.sign_in("alice").await;
    let (_, body) = app.call(Method::GET, "/auth/me", Some(&token), None).await;
    assert_eq!(body["user_id"], "alice");

    let (status, _) = app
        .call(Method::POST, "/auth/sign-out", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = app.call(Method::GET, "/teams", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["message"].as_str().unwrap().contains("sign in required"));
}

#[tokio::test]
async fn sports_are_public() {
    let app = TestApp::new().await;

    let (status, body) = app.call(Method::GET, "/sports", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 8);

    let (status, body) = app.call(Method::GET, "/sports/baseball", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_periods"], 9);
    assert_eq!(body["period_name"], "Inning");

    let (status, _) = app.call(Method::GET, "/sports/curling", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn teams_and_players() {
    let app = TestApp::new().await;
    let token = app.sign_in("alice").await;

    let (status, team) = app
        .call(
            Method::POST,
            "/teams",
            Some(&token),
            Some(json!({
                "name": "Hawks",
                "sport": "basketball",
                "players": [{ "name": "Ann", "jersey_number": 7 }],
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(team["color"], "#3B82F6");
    assert_eq!(team["players"].as_array().unwrap().len(), 1);
    let team_id = team["id"].as_str().unwrap();

    let (status, _) = app
        .call(
            Method::POST,
            "/players",
            Some(&token),
            Some(json!({ "team_id": team_id, "name": "Ben", "position": "center" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, rosters) = app.call(Method::GET, "/players", Some(&token), None).await;
    assert_eq!(rosters[0]["team"]["id"], team_id);
    assert_eq!(rosters[0]["players"].as_array().unwrap().len(), 2);

    let (status, _) = app
        .call(
            Method::POST,
            "/teams",
            Some(&token),
            Some(json!({ "name": "Bad", "color": "blue" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .call(
            Method::POST,
            "/teams",
            Some(&token),
            Some(json!({ "name": "Jerseys", "players": [{ "name": "Zed", "jersey_number": 1000 }] })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let other = app.sign_in("bob").await;
    let (status, _) = app
        .call(Method::GET, &format!("/teams/{team_id}"), Some(&other), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn scoreboard_controls() {
    let app = TestApp::new().await;
    let token = app.sign_in("alice").await;
    let game = app.new_game(&token, "basketball").await;
    let id = game["id"].as_str().unwrap();
    assert_eq!(game["shot_clock_time"], 24);
    assert_eq!(game["sport"]["has_shot_clock"], true);

    let (status, body) = app
        .call(
            Method::POST,
            &format!("/games/{id}/score"),
            Some(&token),
            Some(json!({ "team": "team1", "delta": 3 })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["team1_score"], 3);

    let (_, body) = app
        .call(
            Method::POST,
            &format!("/games/{id}/score"),
            Some(&token),
            Some(json!({ "team": "team1", "delta": -5 })),
        )
        .await;
    assert_eq!(body["team1_score"], 0);

    let (_, body) = app
        .call(
            Method::POST,
            &format!("/games/{id}/clock/shot/adjust"),
            Some(&token),
            Some(json!({ "seconds": 90 })),
        )
        .await;
    assert_eq!(body["shot_clock_time"], 99);

    let (_, body) = app
        .call(
            Method::POST,
            &format!("/games/{id}/period"),
            Some(&token),
            Some(json!({ "direction": "previous" })),
        )
        .await;
    assert_eq!(body["current_period"], 1);

    let (_, body) = app
        .call(
            Method::POST,
            &format!("/games/{id}/clock/game/toggle"),
            Some(&token),
            None,
        )
        .await;
    assert_eq!(body["is_game_clock_running"], true);

    let (status, body) = app
        .call(
            Method::PUT,
            &format!("/games/{id}/status"),
            Some(&token),
            Some(json!({ "status": "finished" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["game_status"], "finished");
    assert_eq!(body["is_game_clock_running"], false);

    let (status, _) = app
        .call(
            Method::POST,
            &format!("/games/{id}/fouls"),
            Some(&token),
            Some(json!({ "team": "team2", "delta": 1 })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let other = app.sign_in("bob").await;
    let (status, _) = app
        .call(Method::GET, &format!("/games/{id}"), Some(&other), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = app
        .call(
            Method::POST,
            &format!("/games/{id}/clock/game/toggle"),
            Some(&other),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn starting_a_clock_resumes_a_paused_game() {
    let app = TestApp::new().await;
    let token = app.sign_in("alice").await;
    let game = app.new_game(&token, "basketball").await;
    let id = game["id"].as_str().unwrap();

    let (_, body) = app
        .call(
            Method::PUT,
            &format!("/games/{id}/status"),
            Some(&token),
            Some(json!({ "status": "paused" })),
        )
        .await;
    assert_eq!(body["game_status"], "paused");

    let (status, body) = app
        .call(
            Method::POST,
            &format!("/games/{id}/clock/shot/toggle"),
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["is_shot_clock_running"], true);
    assert_eq!(body["game_status"], "active");

    let (_, body) = app
        .call(Method::GET, &format!("/games/{id}"), Some(&token), None)
        .await;
    assert_eq!(body["game_status"], "active");
    assert_eq!(body["is_shot_clock_running"], true);
}

#[tokio::test]
async fn failed_writes_keep_the_committed_state() {
    let app = TestApp::new().await;
    let token = app.sign_in("alice").await;
    let game = app.new_game(&token, "soccer").await;
    let id = game["id"].as_str().unwrap();
    let score = |delta: i64| Some(json!({ "team": "team2", "delta": delta }));

    let (_, body) = app
        .call(Method::POST, &format!("/games/{id}/score"), Some(&token), score(1))
        .await;
    assert_eq!(body["team2_score"], 1);

    app.store.set_offline(true);
    let (status, _) = app
        .call(Method::POST, &format!("/games/{id}/score"), Some(&token), score(1))
        .await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

    app.store.set_offline(false);
    let (_, body) = app
        .call(Method::POST, &format!("/games/{id}/score"), Some(&token), score(1))
        .await;
    assert_eq!(body["team2_score"], 2);
}

#[tokio::test]
async fn degraded_mode_rejects_store_requests() {
    let app = TestApp::new().await;
    let token = app.sign_in("alice").await;

    app.state.update_degraded(true);
    let (status, _) = app.call(Method::GET, "/teams", Some(&token), None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

    let (status, body) = app.call(Method::GET, "/healthcheck", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "degraded");
}

#[tokio::test]
async fn player_stats_and_overview() {
    let app = TestApp::new().await;
    let token = app.sign_in("alice").await;
    let game = app.new_game(&token, "basketball").await;
    let id = game["id"].as_str().unwrap();
    let team1 = game["team1"]["id"].as_str().unwrap();

    let (_, player) = app
        .call(
            Method::POST,
            &format!("/teams/{team1}/players"),
            Some(&token),
            Some(json!({ "name": "Ann" })),
        )
        .await;
    let player_id = player["id"].as_str().unwrap();

    let (status, _) = app
        .call(
            Method::POST,
            &format!("/games/{id}/stats"),
            Some(&token),
            Some(json!({ "player_id": player_id, "stat_type": "points", "value": 12 })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .call(
            Method::POST,
            &format!("/games/{id}/stats"),
            Some(&token),
            Some(json!({ "player_id": player_id, "stat_type": "goals", "value": 1 })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, stats) = app
        .call(Method::GET, &format!("/games/{id}/stats"), Some(&token), None)
        .await;
    assert_eq!(stats.as_array().unwrap().len(), 1);

    app.call(
        Method::POST,
        &format!("/games/{id}/score"),
        Some(&token),
        Some(json!({ "team": "team1", "delta": 5 })),
    )
    .await;
    app.new_game(&token, "soccer").await;

    let (status, overview) = app.call(Method::GET, "/stats", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(overview["total_games"], 2);
    assert_eq!(overview["active_games"], 2);
    assert_eq!(overview["average_score"], 2.5);
    assert_eq!(overview["sports_played"], 2);
    assert_eq!(overview["total_player_stats"], 1);
    assert_eq!(overview["recent_games"][0]["team1_name"], "Home");
    assert_eq!(overview["sport_breakdown"].as_array().unwrap().len(), 8);
    assert_eq!(overview["sport_breakdown"][0]["percentage"], 50.0);

    let (_, filtered) = app
        .call(Method::GET, "/stats?sport_id=soccer", Some(&token), None)
        .await;
    assert_eq!(filtered["total_games"], 1);
    assert_eq!(filtered["average_score"], 0.0);
    assert_eq!(filtered["sports_played"], 2);
}
