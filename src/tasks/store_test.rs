use std::time::Duration;

use mockito::{Matcher, Server};
use serde_json::json;

use super::*;
use crate::config::{SupabaseConfig, Timeouts};
use crate::tasks::types::{Choice, TaskPriority, TaskStatus};

fn client_for(server: &Server) -> SupabaseClient {
    SupabaseClient::new(&SupabaseConfig {
        url: server.url(),
        anon_key: "anon".into(),
        timeouts: Timeouts { request: Duration::from_secs(5), connect: Duration::from_secs(5) },
    })
    .expect("client should build")
}

fn row(id: Uuid) -> serde_json::Value {
    json!({
        "id": id,
        "user_id": Uuid::nil(),
        "account_id": Uuid::nil(),
        "title": "File taxes",
        "description": null,
        "status": "in_progress",
        "priority": "high",
        "due_date": "2025-04-15T00:00:00+00:00",
        "created_at": "2025-03-01T09:30:00.123456+00:00"
    })
}

#[tokio::test]
async fn list_sends_filters_and_decodes_rows() {
    let mut server = Server::new_async().await;
    let id = Uuid::new_v4();
    let mock = server
        .mock("GET", "/rest/v1/tasks")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("select".into(), "*".into()),
            Matcher::UrlEncoded("order".into(), "created_at.desc".into()),
            Matcher::UrlEncoded("status".into(), "eq.in_progress".into()),
            Matcher::UrlEncoded("or".into(), r#"(title.ilike."%tax%",description.ilike."%tax%")"#.into()),
        ]))
        .with_status(200)
        .with_body(json!([row(id)]).to_string())
        .create_async()
        .await;

    let filters = TaskFilters { status: Choice::Only(TaskStatus::InProgress), search: "tax".into(), ..TaskFilters::default() };
    let tasks = client_for(&server)
        .list(&AccessToken::new("jwt"), &filters, TaskSort::default())
        .await
        .unwrap();

    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].id, id);
    assert_eq!(tasks[0].priority, TaskPriority::High);
    assert!(tasks[0].updated_at.is_none());
    mock.assert_async().await;
}

#[tokio::test]
async fn get_maps_missing_row_to_not_found() {
    let mut server = Server::new_async().await;
    let id = Uuid::new_v4();
    let _mock = server
        .mock("GET", "/rest/v1/tasks")
        .match_query(Matcher::UrlEncoded("id".into(), format!("eq.{id}")))
        .with_status(406)
        .with_body(r#"{"code":"PGRST116","message":"JSON object requested, multiple (or no) rows returned"}"#)
        .create_async()
        .await;

    let err = client_for(&server).get(&AccessToken::new("jwt"), id).await.unwrap_err();
    assert!(matches!(err, SupabaseError::NotFound));
}

#[tokio::test]
async fn update_patches_only_present_fields() {
    let mut server = Server::new_async().await;
    let id = Uuid::new_v4();
    let mock = server
        .mock("PATCH", "/rest/v1/tasks")
        .match_query(Matcher::UrlEncoded("id".into(), format!("eq.{id}")))
        .match_body(Matcher::Json(json!({"status": "completed"})))
        .with_status(200)
        .with_body(row(id).to_string())
        .create_async()
        .await;

    client_for(&server)
        .update(&AccessToken::new("jwt"), id, &TaskUpdate::status(TaskStatus::Completed))
        .await
        .unwrap();
    mock.assert_async().await;
}
