use axum::http::StatusCode;
use brightbook_api::handlers::roster::{monday_of, parse_team_ids};
use brightbook_core::models::roster::{Team, TeamMember, TeamSchedule};
use brightbook_db::mock::MockBookingBackend;
use mockall::predicate;
use pretty_assertions::assert_eq;
use serde_json::Value;
use uuid::Uuid;

use crate::test_utils::{build_state, date, test_server};

fn shift(team_id: Uuid, day: &str, start: &str, end: &str, status: &str) -> TeamSchedule {
    TeamSchedule {
        id: Uuid::new_v4(),
        team_id,
        date: date(day),
        start_time: start.to_string(),
        end_time: end.to_string(),
        is_blocked: false,
        is_available: status == "Available",
        is_booked: status == "Booked",
        booking_id: None,
        status: Some(status.to_string()),
        area_id: None,
        district_id: None,
        property_id: None,
    }
}

fn roster_backend(schedules: Vec<TeamSchedule>) -> MockBookingBackend {
    let mut backend = MockBookingBackend::new();
    backend
        .expect_list_schedules()
        .with(predicate::eq(date("2026-11-02")), predicate::eq(date("2026-11-08")))
        .times(1)
        .returning(move |_, _| Ok(schedules.clone()));
    backend
}

#[test]
fn test_monday_of() {
    assert_eq!(monday_of(date("2026-11-05")), date("2026-11-02"));
    assert_eq!(monday_of(date("2026-11-02")), date("2026-11-02"));
    assert_eq!(monday_of(date("2026-11-08")), date("2026-11-02"));
}

#[test]
fn test_parse_team_ids() {
    let first = Uuid::new_v4();
    let second = Uuid::new_v4();

    assert!(parse_team_ids(None).unwrap().is_empty());
    assert!(parse_team_ids(Some(" , ")).unwrap().is_empty());
    let ids = parse_team_ids(Some(&format!("{first}, {second}"))).unwrap();
    assert_eq!(ids.len(), 2);
    assert!(ids.contains(&first) && ids.contains(&second));
    assert!(parse_team_ids(Some("not-a-uuid")).is_err());
}

#[tokio::test]
async fn test_week_grid_groups_shifts_by_window() {
    let team_a = Uuid::new_v4();
    let team_b = Uuid::new_v4();
    let server = test_server(build_state(roster_backend(vec![
        shift(team_a, "2026-11-03", "09:00", "12:00", "Booked"),
        shift(team_b, "2026-11-03", "09:00", "12:00", "Available"),
        shift(team_a, "2026-11-04", "14:00", "16:00", "mystery"),
        // Outside the requested week.
        shift(team_a, "2026-11-10", "09:00", "12:00", "Booked"),
    ])));

    let response = server
        .get("/api/roster")
        .add_query_param("week_start", "2026-11-02")
        .add_query_param("first_hour", 8)
        .add_query_param("last_hour", 18)
        .await;

    response.assert_status_ok();
    let grid = response.json::<Value>();
    assert_eq!(grid["week_end"], "2026-11-08");
    let days = grid["days"].as_array().unwrap();
    assert_eq!(days.len(), 7);

    // Tuesday, 09:00 is the second row of an 08:00-18:00 grid.
    let tuesday = &days[1]["cells"];
    assert_eq!(tuesday.as_array().unwrap().len(), 10);
    let group = &tuesday[1]["groups"][0];
    assert_eq!(group["row_span"], 3);
    assert_eq!(group["schedules"].as_array().unwrap().len(), 2);
    assert!(tuesday[2]["groups"].as_array().unwrap().is_empty());

    let wednesday_card = &days[2]["cells"][6]["groups"][0]["schedules"][0];
    assert_eq!(wednesday_card["roster_status"], "Unknown");
    assert_eq!(wednesday_card["color"], "#d1d5db");

    let groups_in_week: usize = days
        .iter()
        .flat_map(|day| day["cells"].as_array().unwrap())
        .map(|cell| cell["groups"].as_array().unwrap().len())
        .sum();
    assert_eq!(groups_in_week, 2);
}

#[tokio::test]
async fn test_week_grid_filters_by_team() {
    let team_a = Uuid::new_v4();
    let team_b = Uuid::new_v4();
    let server = test_server(build_state(roster_backend(vec![
        shift(team_a, "2026-11-03", "09:00", "12:00", "Booked"),
        shift(team_b, "2026-11-03", "09:00", "12:00", "Available"),
    ])));

    let grid = server
        .get("/api/roster")
        .add_query_param("week_start", "2026-11-02")
        .add_query_param("team_ids", team_b.to_string())
        .await
        .json::<Value>();

    // Default grid starts at 06:00.
    let schedules = grid["days"][1]["cells"][3]["groups"][0]["schedules"].as_array().unwrap();
    assert_eq!(schedules.len(), 1);
    assert_eq!(schedules[0]["teamId"], team_b.to_string());
}

#[tokio::test]
async fn test_week_grid_rejects_bad_input() {
    let server = test_server(build_state(MockBookingBackend::new()));

    server
        .get("/api/roster")
        .add_query_param("team_ids", "nope")
        .await
        .assert_status(StatusCode::BAD_REQUEST);
    server
        .get("/api/roster")
        .add_query_param("first_hour", 20)
        .add_query_param("last_hour", 8)
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_teams() {
    let team_id = Uuid::new_v4();
    let team = Team {
        id: team_id,
        name: "Team Falcon".to_string(),
        members: vec![TeamMember {
            id: Uuid::new_v4(),
            team_id,
            name: "Rosa".to_string(),
            role: Some("lead".to_string()),
        }],
    };
    let mut backend = MockBookingBackend::new();
    let teams = vec![team.clone()];
    backend.expect_list_teams().returning(move || Ok(teams.clone()));
    let server = test_server(build_state(backend));

    let response = server.get("/api/teams").await;

    response.assert_status_ok();
    assert_eq!(response.json::<Vec<Team>>(), vec![team]);
}
