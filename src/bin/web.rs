//! Single binary web server: bracket engine behind a JSON REST API.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default. Override with env: HOST, PORT,
//! INACTIVITY_TIMEOUT_HOURS, CLEANUP_INTERVAL_MINUTES. Log level via RUST_LOG.

use actix_web::{
    delete, get, post, put,
    web::{Data, Json, Path},
    App, HttpResponse, HttpServer, Responder,
};
use cup_bracket_web::config::ServerConfig;
use cup_bracket_web::logic::{parse_date, parse_time};
use cup_bracket_web::{
    assign_slot, close_series, init_bracket, undo_series, update_leg, BracketError,
    BracketOptions, CsvStandings, ErrorKind, LegId, LegUpdate, Penalties, RoundKey,
    ScheduleUpdate, SeedSource, Slot, StandingRow, TeamId, Tournament, TournamentId,
};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;
use std::time::{Duration, Instant};

/// Per-tournament entry: tournament data + last activity time (for auto-cleanup).
struct TournamentEntry {
    tournament: Tournament,
    last_activity: Instant,
}

/// In-memory state: tournaments by id. The write lock serializes every mutation.
type AppState = Data<RwLock<HashMap<TournamentId, TournamentEntry>>>;

#[derive(serde::Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct CreateTournamentBody {
    #[serde(default)]
    name: String,
}

#[derive(Deserialize)]
struct AddTeamBody {
    name: String,
}

#[derive(Deserialize)]
struct InitBracketBody {
    /// Seed from a league table (`standings` or `standings_csv`).
    #[serde(default)]
    seed_from_table: bool,
    #[serde(default)]
    standings: Option<Vec<StandingRow>>,
    #[serde(default)]
    standings_csv: Option<String>,
    #[serde(default)]
    clasificados: Option<usize>,
    /// Random draw of these teams. Without any seed source all registered teams are drawn.
    #[serde(default)]
    seed_team_ids: Option<Vec<TeamId>>,
    #[serde(default)]
    manual_slots: Option<BTreeMap<usize, Option<TeamId>>>,
    #[serde(flatten)]
    options: BracketOptions,
}

#[derive(Deserialize)]
struct CloseSeriesBody {
    round_key: RoundKey,
    match_no: u32,
    #[serde(default, alias = "penalties_home")]
    penales_home: Option<u32>,
    #[serde(default, alias = "penalties_away")]
    penales_away: Option<u32>,
    #[serde(default)]
    expected_version: Option<u64>,
}

#[derive(Deserialize)]
struct UndoSeriesBody {
    round_key: RoundKey,
    match_no: u32,
    #[serde(default)]
    expected_version: Option<u64>,
}

#[derive(Deserialize)]
struct AssignSlotBody {
    match_id: LegId,
    slot: Slot,
    team_id: TeamId,
    #[serde(default)]
    expected_version: Option<u64>,
}

#[derive(Deserialize)]
struct SetMatchBody {
    #[serde(default, alias = "fecha")]
    date: Option<String>,
    #[serde(default, alias = "hora")]
    time: Option<String>,
    #[serde(default, alias = "cancha")]
    venue: Option<String>,
    #[serde(default)]
    home_goals: Option<u32>,
    #[serde(default)]
    away_goals: Option<u32>,
    #[serde(default)]
    expected_version: Option<u64>,
}

/// Path segment: tournament id (e.g. /api/tournaments/{id})
#[derive(Deserialize)]
struct TournamentPath {
    id: TournamentId,
}

/// Path segments: tournament id and team id (e.g. /api/tournaments/{id}/teams/{team_id})
#[derive(Deserialize)]
struct TournamentTeamPath {
    id: TournamentId,
    team_id: TeamId,
}

/// Path segments: tournament id and leg id (e.g. /api/tournaments/{id}/matches/{match_id})
#[derive(Deserialize)]
struct TournamentMatchPath {
    id: TournamentId,
    match_id: LegId,
}

fn error_response(e: &BracketError) -> HttpResponse {
    let body = match e {
        BracketError::PenaltiesRequired {
            aggregate_home,
            aggregate_away,
        } => serde_json::json!({
            "error": e.to_string(),
            "penalties_required": true,
            "aggregate_home": aggregate_home,
            "aggregate_away": aggregate_away,
        }),
        _ => serde_json::json!({ "error": e.to_string() }),
    };
    match e.kind() {
        ErrorKind::Validation => HttpResponse::BadRequest().json(body),
        ErrorKind::NeedsInput => HttpResponse::UnprocessableEntity().json(body),
        ErrorKind::Conflict | ErrorKind::Misuse => HttpResponse::Conflict().json(body),
        ErrorKind::NotFound => HttpResponse::NotFound().json(body),
    }
}

fn bad_request(message: &str) -> HttpResponse {
    HttpResponse::BadRequest().json(serde_json::json!({ "error": message }))
}

/// Run `f` on a tournament under the write lock and answer with the updated tournament.
/// Touching a tournament refreshes its last_activity.
fn with_tournament<F>(state: &AppState, id: TournamentId, f: F) -> HttpResponse
where
    F: FnOnce(&mut Tournament) -> Result<(), BracketError>,
{
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let entry = match g.get_mut(&id) {
        Some(e) => e,
        None => return HttpResponse::NotFound().json(serde_json::json!({ "error": "No tournament" })),
    };
    entry.last_activity = Instant::now();
    let t = &mut entry.tournament;
    match f(t) {
        Ok(()) => HttpResponse::Ok().json(&*t),
        Err(e) => {
            log::debug!("Tournament {}: {}", id, e);
            error_response(&e)
        }
    }
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "cup-bracket-web",
    })
}

/// Create a new tournament (returns it with id; client stores id for subsequent requests).
#[post("/api/tournaments")]
async fn api_create_tournament(state: AppState, body: Option<Json<CreateTournamentBody>>) -> HttpResponse {
    let name = body.map(|b| b.into_inner().name).unwrap_or_default();
    let tournament = Tournament::new(name);
    let id = tournament.id;
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let response = HttpResponse::Ok().json(&tournament);
    g.insert(
        id,
        TournamentEntry {
            tournament,
            last_activity: Instant::now(),
        },
    );
    log::info!("Created tournament {}", id);
    response
}

/// Full tournament: teams and the Round/Series/Leg tree.
#[get("/api/tournaments/{id}")]
async fn api_get_tournament(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    with_tournament(&state, path.id, |_| Ok(()))
}

/// Bracket only (404 before it is initialised).
#[get("/api/tournaments/{id}/bracket")]
async fn api_get_bracket(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match g.get_mut(&path.id) {
        Some(entry) => {
            entry.last_activity = Instant::now();
            match entry.tournament.bracket() {
                Ok(bracket) => HttpResponse::Ok().json(bracket),
                Err(e) => error_response(&e),
            }
        }
        None => HttpResponse::NotFound().json(serde_json::json!({ "error": "No tournament" })),
    }
}

/// Delete a tournament and its bracket.
#[delete("/api/tournaments/{id}")]
async fn api_delete_tournament(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match g.remove(&path.id) {
        Some(_) => HttpResponse::NoContent().finish(),
        None => HttpResponse::NotFound().json(serde_json::json!({ "error": "No tournament" })),
    }
}

/// Register a team.
#[post("/api/tournaments/{id}/teams")]
async fn api_add_team(state: AppState, path: Path<TournamentPath>, body: Json<AddTeamBody>) -> HttpResponse {
    with_tournament(&state, path.id, |t| t.add_team(body.name.as_str()).map(|_| ()))
}

/// Remove a team (only before the bracket exists).
#[delete("/api/tournaments/{id}/teams/{team_id}")]
async fn api_remove_team(state: AppState, path: Path<TournamentTeamPath>) -> HttpResponse {
    with_tournament(&state, path.id, |t| t.remove_team(path.team_id))
}

/// Seed and create the bracket.
#[post("/api/tournaments/{id}/bracket")]
async fn api_init_bracket(state: AppState, path: Path<TournamentPath>, body: Json<InitBracketBody>) -> HttpResponse {
    let body = body.into_inner();
    with_tournament(&state, path.id, |t| {
        if body.seed_from_table {
            let rows = match (body.standings, body.standings_csv) {
                (Some(rows), _) => rows,
                (None, Some(csv)) => CsvStandings::parse(&csv)?.rows().to_vec(),
                (None, None) => Vec::new(),
            };
            let clasificados = body.clasificados.unwrap_or(rows.len());
            let source = SeedSource::Table {
                provider: &rows,
                clasificados,
            };
            return init_bracket(t, source, &body.options);
        }
        if let Some(slots) = &body.manual_slots {
            return init_bracket(t, SeedSource::Manual(slots), &body.options);
        }
        let team_ids = body
            .seed_team_ids
            .unwrap_or_else(|| t.teams.iter().map(|team| team.id).collect());
        init_bracket(t, SeedSource::Random(&team_ids), &body.options)
    })
}

/// Close a series; 422 with the aggregates when penalties are needed.
#[post("/api/tournaments/{id}/series/close")]
async fn api_close_series(state: AppState, path: Path<TournamentPath>, body: Json<CloseSeriesBody>) -> HttpResponse {
    let penalties = match (body.penales_home, body.penales_away) {
        (Some(home), Some(away)) => Some(Penalties { home, away }),
        (None, None) => None,
        _ => return bad_request("Both penalty scores are required"),
    };
    with_tournament(&state, path.id, |t| {
        let bracket = t.bracket_mut()?;
        bracket.check_version(body.expected_version)?;
        close_series(bracket, body.round_key, body.match_no, penalties).map(|_| ())
    })
}

/// Reopen a closed series (cascades downstream).
#[post("/api/tournaments/{id}/series/undo")]
async fn api_undo_series(state: AppState, path: Path<TournamentPath>, body: Json<UndoSeriesBody>) -> HttpResponse {
    with_tournament(&state, path.id, |t| {
        let bracket = t.bracket_mut()?;
        bracket.check_version(body.expected_version)?;
        undo_series(bracket, body.round_key, body.match_no).map(|_| ())
    })
}

/// Fill an empty first-round slot with a registered team.
#[put("/api/tournaments/{id}/slots")]
async fn api_assign_slot(state: AppState, path: Path<TournamentPath>, body: Json<AssignSlotBody>) -> HttpResponse {
    with_tournament(&state, path.id, |t| {
        t.require_team(body.team_id)?;
        let bracket = t.bracket_mut()?;
        bracket.check_version(body.expected_version)?;
        assign_slot(bracket, body.match_id, body.slot, body.team_id)
    })
}

/// Update a leg's schedule and/or score.
#[put("/api/tournaments/{id}/matches/{match_id}")]
async fn api_set_match(
    state: AppState,
    path: Path<TournamentMatchPath>,
    body: Json<SetMatchBody>,
) -> HttpResponse {
    let body = body.into_inner();
    with_tournament(&state, path.id, |t| {
        let update = LegUpdate {
            schedule: ScheduleUpdate {
                date: body.date.as_deref().map(parse_date).transpose()?,
                time: body.time.as_deref().map(parse_time).transpose()?,
                venue: body.venue,
            },
            home_goals: body.home_goals,
            away_goals: body.away_goals,
        };
        let bracket = t.bracket_mut()?;
        bracket.check_version(body.expected_version)?;
        update_leg(bracket, path.match_id, update)
    })
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = ServerConfig::from_env();
    log::info!("Starting server at http://{}:{}", config.host, config.port);

    let state = Data::new(RwLock::new(HashMap::<TournamentId, TournamentEntry>::new()));

    // Background task: periodically remove tournaments with no recent activity
    let state_cleanup = state.clone();
    let inactivity_timeout = config.inactivity_timeout;
    let cleanup_interval = config.cleanup_interval;
    actix_web::rt::spawn(async move {
        let mut interval = tokio::time::interval(cleanup_interval);
        loop {
            interval.tick().await;
            let mut g = match state_cleanup.write() {
                Ok(guard) => guard,
                Err(_) => continue,
            };
            let before = g.len();
            g.retain(|_, entry| entry.last_activity.elapsed() < inactivity_timeout);
            let removed = before - g.len();
            if removed > 0 {
                log::info!(
                    "Cleaned up {} inactive tournament(s) (no activity for {})",
                    removed,
                    format_duration(inactivity_timeout)
                );
            }
        }
    });

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .service(api_health)
            .service(api_create_tournament)
            .service(api_get_tournament)
            .service(api_get_bracket)
            .service(api_delete_tournament)
            .service(api_add_team)
            .service(api_remove_team)
            .service(api_init_bracket)
            .service(api_close_series)
            .service(api_undo_series)
            .service(api_assign_slot)
            .service(api_set_match)
    })
    .bind(config.bind_addr())?
    .run()
    .await
}

fn format_duration(d: Duration) -> String {
    let hours = d.as_secs() / 3600;
    if hours > 0 {
        format!("{}h", hours)
    } else {
        format!("{}m", d.as_secs() / 60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{http::StatusCode, test};
    use cup_bracket_web::set_score;
    use serde_json::{json, Value};

    /// Two-team tournament whose single-leg final is scored but not closed.
    fn scored_final(home_goals: u32, away_goals: u32) -> (Tournament, TeamId) {
        let mut t = Tournament::new("Cup");
        let home = t.add_team("Lions").unwrap();
        let away = t.add_team("Tigers").unwrap();
        let slots = BTreeMap::from([(0, Some(home)), (1, Some(away))]);
        init_bracket(&mut t, SeedSource::Manual(&slots), &BracketOptions::default()).unwrap();
        let bracket = t.bracket_mut().unwrap();
        let leg_id = bracket.rounds[0].series[0].legs[0].id;
        set_score(bracket, leg_id, Some(home_goals), Some(away_goals)).unwrap();
        (t, home)
    }

    fn state_with(tournament: Tournament) -> AppState {
        let mut map = HashMap::new();
        map.insert(
            tournament.id,
            TournamentEntry {
                tournament,
                last_activity: Instant::now(),
            },
        );
        Data::new(RwLock::new(map))
    }

    fn version(state: &AppState, id: TournamentId) -> u64 {
        let g = state.read().unwrap();
        g[&id].tournament.bracket().unwrap().version
    }

    #[actix_web::test]
    async fn close_and_undo_map_errors_to_status_codes() {
        let (tournament, home) = scored_final(1, 1);
        let id = tournament.id;
        let state = state_with(tournament);
        let app = test::init_service(
            App::new()
                .app_data(state.clone())
                .service(api_close_series)
                .service(api_undo_series),
        )
        .await;
        let close_uri = format!("/api/tournaments/{id}/series/close");
        let undo_uri = format!("/api/tournaments/{id}/series/undo");

        // Level without penalties: 422 carrying the aggregates.
        let req = test::TestRequest::post()
            .uri(&close_uri)
            .set_json(json!({ "round_key": "F", "match_no": 1 }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["penalties_required"], json!(true));
        assert_eq!(body["aggregate_home"], json!(1));
        assert_eq!(body["aggregate_away"], json!(1));

        // Only one penalty score.
        let req = test::TestRequest::post()
            .uri(&close_uri)
            .set_json(json!({ "round_key": "F", "match_no": 1, "penales_home": 4 }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

        // Stale version.
        let stale = version(&state, id) + 1;
        let req = test::TestRequest::post()
            .uri(&close_uri)
            .set_json(json!({
                "round_key": "F",
                "match_no": 1,
                "penales_home": 4,
                "penales_away": 2,
                "expected_version": stale,
            }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CONFLICT);

        // Unknown series and unknown tournament.
        let req = test::TestRequest::post()
            .uri(&close_uri)
            .set_json(json!({ "round_key": "SF", "match_no": 1 }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
        let req = test::TestRequest::post()
            .uri(&format!("/api/tournaments/{}/series/close", TournamentId::new_v4()))
            .set_json(json!({ "round_key": "F", "match_no": 1 }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

        // Undoing an open series.
        let req = test::TestRequest::post()
            .uri(&undo_uri)
            .set_json(json!({ "round_key": "F", "match_no": 1 }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CONFLICT);

        // Resubmitted with penalties and the current version.
        let current = version(&state, id);
        let req = test::TestRequest::post()
            .uri(&close_uri)
            .set_json(json!({
                "round_key": "F",
                "match_no": 1,
                "penalties_home": 4,
                "penalties_away": 2,
                "expected_version": current,
            }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
        {
            let g = state.read().unwrap();
            assert_eq!(g[&id].tournament.bracket().unwrap().champion(), Some(home));
        }
        assert_eq!(version(&state, id), current + 1);
    }
}
