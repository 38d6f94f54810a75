//! End-to-end tests against a running server with the built-in dataset.

use std::collections::HashSet;

use catalog_client::{CatalogClient, ClientError, Subject};
use reqwest::StatusCode;

mod common;

#[tokio::test]
async fn test_schools_unique_and_non_empty() {
    let (running, base) = common::start_app(common::local_config()).await;
    let client = CatalogClient::new(&base);

    let schools = client.schools().await.unwrap();
    assert!(!schools.is_empty());
    assert_eq!(schools.iter().collect::<HashSet<_>>().len(), schools.len());
    assert!(schools.contains(&"ENG".to_string()));

    running.stop().await.unwrap();
}

#[tokio::test]
async fn test_subjects_partition_by_school() {
    let (running, base) = common::start_app(common::local_config()).await;
    let client = CatalogClient::new(&base);

    let all = client.subjects(None).await.unwrap();
    let mut union: Vec<Subject> = Vec::new();
    for school in client.schools().await.unwrap() {
        let subjects = client.subjects(Some(school.as_str())).await.unwrap();
        assert!(subjects.iter().all(|s| s.school == school));
        union.extend(subjects);
    }

    assert_eq!(all.len(), union.len());
    assert_eq!(
        all.iter().collect::<HashSet<_>>(),
        union.iter().collect::<HashSet<_>>()
    );

    running.stop().await.unwrap();
}

#[tokio::test]
async fn test_listed_subjects_are_always_selectable() {
    let (running, base) = common::start_app(common::local_config()).await;
    let client = CatalogClient::new(&base);

    for subject in client.subjects(None).await.unwrap() {
        let courses = client
            .courses("1194", &subject.school, &subject.subject)
            .await
            .unwrap();
        assert!(courses
            .iter()
            .all(|c| c.term == 1194 && c.school == subject.school && c.subject == subject.subject));
    }

    running.stop().await.unwrap();
}

#[tokio::test]
async fn test_course_lookup() {
    let (running, base) = common::start_app(common::local_config()).await;
    let client = CatalogClient::new(&base);

    let courses = client.courses("1194", "ENG", "CS").await.unwrap();
    let numbers: Vec<_> = courses.iter().map(|c| c.number.as_str()).collect();
    assert_eq!(numbers, vec!["1114", "2124"]);
    assert_eq!(courses[0].sections.len(), 2);
    assert_eq!(courses[0].sections[0].meetings[0].days, "MW");

    // path segments are case-insensitive
    assert_eq!(client.courses("1194", "eng", "cs").await.unwrap(), courses);

    assert!(client.courses("1191", "ENG", "CS").await.unwrap().is_empty());

    running.stop().await.unwrap();
}

#[tokio::test]
async fn test_bad_requests_do_not_take_the_server_down() {
    let (running, base) = common::start_app(common::local_config()).await;
    let client = CatalogClient::new(&base);

    let err = client.courses("abc", "ENG", "CS").await.unwrap_err();
    assert_eq!(err.status(), Some(StatusCode::BAD_REQUEST));

    let err = client.courses("1199", "ENG", "CS").await.unwrap_err();
    assert_eq!(err.status(), Some(StatusCode::BAD_REQUEST));

    let err = client.subjects(Some("LAW")).await.unwrap_err();
    assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));

    // still serving
    assert!(!client.schools().await.unwrap().is_empty());

    running.stop().await.unwrap();
}

#[tokio::test]
async fn test_reserved_characters_stay_inside_one_segment() {
    let (running, base) = common::start_app(common::local_config()).await;
    let client = CatalogClient::new(&base);

    match client.subjects(Some("EN/G")).await.unwrap_err() {
        ClientError::Api { status, body } => {
            assert_eq!(status, StatusCode::NOT_FOUND);
            assert_eq!(body.message, "unknown school: EN/G");
        }
        other => panic!("unexpected error: {}", other),
    }

    // routed to the course lookup, not cut short at `?` or `#`
    assert!(client.courses("1194", "ENG?x", "CS").await.unwrap().is_empty());
    assert!(client.courses("1194", "ENG", "CS#1").await.unwrap().is_empty());

    running.stop().await.unwrap();
}

#[tokio::test]
async fn test_request_id_header() {
    let (running, base) = common::start_app(common::local_config()).await;

    let res = reqwest::get(format!("{}/schools", base)).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.headers().contains_key("x-request-id"));
    assert_eq!(
        res.headers()["content-type"],
        "application/json"
    );

    running.stop().await.unwrap();
}
