use mockito::Matcher;
use planman::calendar::GoogleCalendarSource;
use planman::{CalendarDate, EventSource, MonthIndexBuilder, MonthKey};
use reqwest::Client;
use std::sync::Arc;

fn window_query(extra: Vec<Matcher>) -> Matcher {
    let mut matchers = vec![
        Matcher::UrlEncoded("timeMin".into(), "2024-02-01T00:00:00Z".into()),
        Matcher::UrlEncoded("timeMax".into(), "2024-02-29T23:59:59Z".into()),
        Matcher::UrlEncoded("singleEvents".into(), "true".into()),
        Matcher::UrlEncoded("orderBy".into(), "startTime".into()),
    ];
    matchers.extend(extra);
    Matcher::AllOf(matchers)
}

fn source(server: &mockito::Server) -> GoogleCalendarSource {
    GoogleCalendarSource::new(Client::new(), &server.url(), "primary", "test-token").unwrap()
}

fn date(year: i32, month: u32, day: u32) -> CalendarDate {
    CalendarDate::from_ymd(year, month, day).unwrap()
}

#[tokio::test]
async fn test_lists_month_with_expected_query() {
    let mut server = mockito::Server::new_async().await;

    let response_body = r#"{
        "kind": "calendar#events",
        "items": [
            {"id": "1", "status": "confirmed", "summary": "Leap party", "start": {"date": "2024-02-29"}},
            {"id": "2", "status": "confirmed", "summary": "Standup", "start": {"dateTime": "2024-02-05T09:00:00-05:00"}},
            {"id": "3", "status": "cancelled"},
            {"id": "4", "status": "confirmed", "start": {"dateTime": "2024-02-05T18:00:00Z"}}
        ]
    }"#;

    let mock = server
        .mock("GET", "/calendars/primary/events")
        .match_query(window_query(Vec::new()))
        .match_header("authorization", "Bearer test-token")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(response_body)
        .expect(1)
        .create_async()
        .await;

    let builder = MonthIndexBuilder::new(Arc::new(source(&server)));
    let index = builder.build(2024, 2).await.unwrap();

    mock.assert_async().await;
    assert_eq!(index.event_count(), 3);
    assert_eq!(index.events_on(date(2024, 2, 29))[0].as_str(), "Leap party");
    let titles: Vec<_> = index.events_on(date(2024, 2, 5)).iter().map(|s| s.as_str()).collect();
    assert_eq!(titles, vec!["Standup", "Untitled"]);
}

#[tokio::test]
async fn test_follows_page_tokens() {
    let mut server = mockito::Server::new_async().await;

    let first = server
        .mock("GET", "/calendars/primary/events")
        .match_query(window_query(Vec::new()))
        .with_status(200)
        .with_body(r#"{"items":[{"id":"a","summary":"First","start":{"date":"2024-02-01"}}],"nextPageToken":"p2"}"#)
        .expect(1)
        .create_async()
        .await;
    let second = server
        .mock("GET", "/calendars/primary/events")
        .match_query(window_query(vec![Matcher::UrlEncoded("pageToken".into(), "p2".into())]))
        .with_status(200)
        .with_body(r#"{"items":[{"id":"b","summary":"Second","start":{"date":"2024-02-02"}}]}"#)
        .expect(1)
        .create_async()
        .await;

    let window = MonthKey::new(2024, 2).unwrap().window();
    let occurrences = source(&server).list_occurrences(window).await.unwrap();

    first.assert_async().await;
    second.assert_async().await;
    let titles: Vec<_> = occurrences.iter().map(|o| o.title.as_deref()).collect();
    assert_eq!(titles, vec![Some("First"), Some("Second")]);
}

#[tokio::test]
async fn test_rejected_request_is_fetch_error() {
    let mut server = mockito::Server::new_async().await;

    let _mock = server
        .mock("GET", "/calendars/primary/events")
        .match_query(Matcher::Any)
        .with_status(401)
        .with_body(r#"{"error":{"code":401,"message":"Invalid Credentials"}}"#)
        .create_async()
        .await;

    let builder = MonthIndexBuilder::new(Arc::new(source(&server)));
    let err = builder.build(2024, 2).await.unwrap_err();

    assert!(err.is_fetch());
    let message = err.to_string();
    assert!(message.contains("HTTP 401"));
    assert!(message.contains("Invalid Credentials"));
}

#[tokio::test]
async fn test_malformed_payload_is_fetch_error() {
    let mut server = mockito::Server::new_async().await;

    let _mock = server
        .mock("GET", "/calendars/primary/events")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("{not json")
        .create_async()
        .await;

    let builder = MonthIndexBuilder::new(Arc::new(source(&server)));
    let err = builder.build(2024, 2).await.unwrap_err();

    assert!(err.is_fetch());
    assert!(err.to_string().contains("invalid events payload"));
}

#[tokio::test]
async fn test_item_with_unusable_start_fails_the_month() {
    let mut server = mockito::Server::new_async().await;

    let _mock = server
        .mock("GET", "/calendars/primary/events")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"items":[{"id":"bad","summary":"Broken","start":{"dateTime":"tomorrow-ish"}}]}"#)
        .create_async()
        .await;

    let builder = MonthIndexBuilder::new(Arc::new(source(&server)));
    let err = builder.build(2024, 2).await.unwrap_err();

    assert!(err.is_fetch());
    assert!(err.to_string().contains("event bad has an unusable start"));
}
