// 集成测试 - 通过脚本化后端驱动完整编排流程

use std::sync::Arc;
use travel_assistant_agent::agents::attraction_image_url;
use travel_assistant_agent::{
    create_plan, AgentSettings, DecodePolicy, Orchestrator, ScriptedBackend, ScriptedReply,
    UserQuery,
};

const ATTRACTIONS: &str = r#"{"attractions":[
    {"name":"Eiffel Tower","rating":4.6,"reviewCount":140000,"priceLevel":"$$","description":"Wrought-iron tower","url":"https://www.toureiffel.paris","categories":["landmark"]},
    {"name":"Musée d'Orsay","rating":4.8,"reviewCount":60000,"priceLevel":"$$","description":"Impressionist art","url":"https://www.musee-orsay.fr","categories":["museum"]}
]}"#;

const GUIDE: &str = "## Paris\n\nTop Attractions\nEiffel Tower**\nSee https://www.toureiffel.paris for tickets.";

fn paris_query() -> UserQuery {
    UserQuery::new("flight to Paris, then places to visit")
        .with_from("NYC")
        .with_location("Paris")
        .with_dates("2025-06-01", None)
}

#[tokio::test]
async fn test_flight_failure_keeps_partial_results() {
    let backend = Arc::new(
        ScriptedBackend::new()
            .reply("returnFlights", ScriptedReply::Failure("network unreachable".to_string()))
            .reply("returnAttractions", ScriptedReply::Arguments(ATTRACTIONS.to_string()))
            .reply("text", ScriptedReply::Content(GUIDE.to_string())),
    );
    let orchestrator = Orchestrator::new(backend.clone(), AgentSettings::default());

    let response = orchestrator.coordinate_request(&paris_query()).await.unwrap();

    assert!(response.flights.is_none());
    let attractions = response.attractions.expect("attractions requested and returned");
    assert_eq!(attractions.len(), 2);
    assert_eq!(attractions[0].image_url, attraction_image_url("Eiffel Tower"));
    let info = response.general_info.expect("general info always requested");
    assert_eq!(info.sources, vec!["https://www.toureiffel.paris".to_string()]);
    assert_eq!(response.errors, vec!["Failed to search for flights".to_string()]);

    // 三个槽位都实际发出了请求
    assert_eq!(backend.requests().len(), 3);
}

#[tokio::test]
async fn test_flight_request_carries_plan_parameters() {
    let backend = Arc::new(
        ScriptedBackend::new()
            .reply("returnFlights", ScriptedReply::Arguments(r#"{"flights":[]}"#.to_string()))
            .reply("returnAttractions", ScriptedReply::Arguments("{}".to_string()))
            .reply("text", ScriptedReply::Empty),
    );
    let orchestrator = Orchestrator::new(backend.clone(), AgentSettings::default());

    let plan = create_plan(&paris_query());
    let flight = plan.flight_params.as_ref().unwrap();
    assert_eq!(
        (flight.from.as_str(), flight.to.as_str(), flight.date.as_str()),
        ("NYC", "Paris", "2025-06-01")
    );

    let response = orchestrator.coordinate_request(&paris_query()).await.unwrap();
    assert_eq!(response.flights, Some(Vec::new()));
    assert_eq!(response.attractions, Some(Vec::new()));
    assert!(response.errors.is_empty());

    let flight_request = backend
        .requests()
        .into_iter()
        .find(|r| r.contract_name() == Some("returnFlights"))
        .unwrap();
    let user_prompt = &flight_request.messages[1].content;
    assert!(user_prompt.contains("from NYC to Paris on 2025-06-01"));
}

#[tokio::test]
async fn test_strict_policy_surfaces_missing_keys() {
    let backend = Arc::new(
        ScriptedBackend::new()
            .reply("returnFlights", ScriptedReply::Arguments("{}".to_string()))
            .reply("returnAttractions", ScriptedReply::Arguments(ATTRACTIONS.to_string()))
            .reply("text", ScriptedReply::Failure("model overloaded".to_string())),
    );
    let settings = AgentSettings {
        decode_policy: DecodePolicy::Strict,
        ..AgentSettings::default()
    };
    let orchestrator = Orchestrator::new(backend, settings);

    let response = orchestrator.coordinate_request(&paris_query()).await.unwrap();
    assert!(response.flights.is_none());
    assert!(response.attractions.is_some());
    assert!(response.general_info.is_none());
    assert_eq!(
        response.errors,
        vec![
            "Failed to search for flights".to_string(),
            "Failed to fetch travel information".to_string(),
        ]
    );
}

#[tokio::test]
async fn test_general_info_failure_is_reported_under_default_policy() {
    let backend = Arc::new(
        ScriptedBackend::new().reply("text", ScriptedReply::Failure("network down".to_string())),
    );
    let orchestrator = Orchestrator::new(backend, AgentSettings::default());

    let response = orchestrator
        .coordinate_request(&UserQuery::new("best museums").with_location("Rome"))
        .await
        .unwrap();

    assert!(response.general_info.is_none());
    assert_eq!(response.errors, vec!["Failed to fetch travel information".to_string()]);
}

#[tokio::test]
async fn test_whitespace_destination_and_date_still_request_flights() {
    let backend = Arc::new(
        ScriptedBackend::new()
            .reply("returnFlights", ScriptedReply::Arguments(r#"{"flights":[]}"#.to_string()))
            .reply("text", ScriptedReply::Content("## Guide".to_string())),
    );
    let orchestrator = Orchestrator::new(backend.clone(), AgentSettings::default());
    let query = UserQuery::new("museums").with_location(" ").with_dates(" ", None);

    let response = orchestrator.coordinate_request(&query).await.unwrap();
    assert_eq!(response.flights, Some(Vec::new()));
    assert!(response.errors.is_empty());
    assert_eq!(backend.requests().len(), 2);
}
