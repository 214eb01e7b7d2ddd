use crate::helpers::TestContext;

use hyper::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::json;
use test_context::test_context;

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_create_a_task(ctx: &TestContext) {
    let response = ctx
        .client
        .post(
            "/tasks/",
            &json!({
                "title": "  Write report  ",
                "description": "Quarterly numbers"
            }),
        )
        .await
        .unwrap();

    response.assert_status(StatusCode::CREATED);

    let body = response.json();
    let id = body["id"].as_i64().expect("Missing id field");
    let created_at = &body["created_at"];
    let updated_at = &body["updated_at"];

    assert_eq!(
        body,
        &json!({
            "id": id,
            "title": "Write report",
            "description": "Quarterly numbers",
            "completed": false,
            "created_at": created_at,
            "updated_at": updated_at,
        })
    );
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_get_a_task_by_id(ctx: &TestContext) {
    let task = ctx.create_task("Buy milk", "Semi-skimmed", false).await;
    let id = task["id"].as_i64().unwrap();

    let response = ctx.client.get(&format!("/tasks/{}/", id)).await.unwrap();

    response.assert_status(StatusCode::OK);
    assert_eq!(response.json(), &task);

    // Trailing slash is optional
    let response = ctx.client.get(&format!("/tasks/{}", id)).await.unwrap();
    response.assert_status(StatusCode::OK);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_replace_a_task(ctx: &TestContext) {
    let task = ctx.create_task("Buy milk", "Semi-skimmed", false).await;
    let id = task["id"].as_i64().unwrap();

    let response = ctx
        .client
        .put(
            &format!("/tasks/{}/", id),
            &json!({
                "title": "Buy oat milk",
                "description": "Barista edition",
                "completed": true
            }),
        )
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);

    let body = response.json();
    assert_eq!(body["id"], id);
    assert_eq!(body["title"], "Buy oat milk");
    assert_eq!(body["description"], "Barista edition");
    assert_eq!(body["completed"], true);
    assert_eq!(body["created_at"], task["created_at"]);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_require_every_field_on_replace(ctx: &TestContext) {
    let task = ctx.create_task("Buy milk", "Semi-skimmed", false).await;
    let id = task["id"].as_i64().unwrap();

    let response = ctx
        .client
        .put(&format!("/tasks/{}/", id), &json!({"completed": true}))
        .await
        .unwrap();

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json()["errors"],
        json!({
            "title": ["This field is required."],
            "description": ["This field is required."],
        })
    );
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_partially_update_a_task(ctx: &TestContext) {
    let task = ctx.create_task("Buy milk", "Semi-skimmed", false).await;
    let id = task["id"].as_i64().unwrap();

    let response = ctx
        .client
        .patch(&format!("/tasks/{}/", id), &json!({"completed": "yes"}))
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);

    let body = response.json();
    assert_eq!(body["title"], "Buy milk");
    assert_eq!(body["description"], "Semi-skimmed");
    assert_eq!(body["completed"], true);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_delete_a_task(ctx: &TestContext) {
    let task = ctx.create_task("Buy milk", "Semi-skimmed", false).await;
    let id = task["id"].as_i64().unwrap();

    let response = ctx.client.delete(&format!("/tasks/{}/", id)).await.unwrap();

    response.assert_status(StatusCode::NO_CONTENT);
    assert!(response.body_bytes.is_empty());

    let response = ctx.client.get(&format!("/tasks/{}/", id)).await.unwrap();
    response.assert_status(StatusCode::NOT_FOUND);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_list_tasks_newest_first(ctx: &TestContext) {
    ctx.create_task("First", "one", false).await;
    ctx.create_task("Second", "two", false).await;
    ctx.create_task("Third", "three", true).await;

    let response = ctx.client.get("/tasks/").await.unwrap();

    response.assert_status(StatusCode::OK);

    let body = response.json();
    assert_eq!(body["currentPage"], 1);
    assert_eq!(body["totalPages"], 1);
    assert_eq!(body["pageSize"], 10);

    let titles: Vec<&str> = body["tasks"]
        .as_array()
        .unwrap()
        .iter()
        .map(|task| task["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Third", "Second", "First"]);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_return_an_empty_first_page(ctx: &TestContext) {
    let response = ctx.client.get("/tasks").await.unwrap();

    response.assert_status(StatusCode::OK);
    assert_eq!(
        response.json(),
        &json!({
            "currentPage": 1,
            "totalPages": 1,
            "pageSize": 10,
            "tasks": [],
        })
    );
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_paginate_tasks(ctx: &TestContext) {
    for index in 0..5 {
        ctx.create_task(&format!("Task {}", index), "body", false)
            .await;
    }

    let response = ctx.client.get("/tasks/?page=2&page_size=2").await.unwrap();

    response.assert_status(StatusCode::OK);

    let body = response.json();
    assert_eq!(body["currentPage"], 2);
    assert_eq!(body["totalPages"], 3);
    assert_eq!(body["pageSize"], 2);

    let titles: Vec<&str> = body["tasks"]
        .as_array()
        .unwrap()
        .iter()
        .map(|task| task["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Task 2", "Task 1"]);

    let response = ctx.client.get("/tasks/?page=last&page_size=2").await.unwrap();
    response.assert_status(StatusCode::OK);
    assert_eq!(response.json()["currentPage"], 3);
    assert_eq!(response.json()["tasks"].as_array().unwrap().len(), 1);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_filter_tasks_by_completion(ctx: &TestContext) {
    ctx.create_task("Open", "body", false).await;
    ctx.create_task("Done", "body", true).await;

    let response = ctx.client.get("/tasks/?completed=true").await.unwrap();
    response.assert_status(StatusCode::OK);
    let tasks = response.json()["tasks"].as_array().unwrap().clone();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0]["title"], "Done");

    let response = ctx.client.get("/tasks/?completed=0").await.unwrap();
    let tasks = response.json()["tasks"].as_array().unwrap().clone();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0]["title"], "Open");

    // Unknown values leave the listing unfiltered
    let response = ctx.client.get("/tasks/?completed=maybe").await.unwrap();
    response.assert_status(StatusCode::OK);
    assert_eq!(response.json()["tasks"].as_array().unwrap().len(), 2);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_search_tasks_by_title_terms(ctx: &TestContext) {
    ctx.create_task("Buy oat milk", "body", false).await;
    ctx.create_task("Buy bread", "milk is elsewhere", false).await;
    ctx.create_task("Call plumber", "body", false).await;

    let response = ctx.client.get("/tasks/?search=MILK,buy").await.unwrap();

    response.assert_status(StatusCode::OK);
    let tasks = response.json()["tasks"].as_array().unwrap().clone();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0]["title"], "Buy oat milk");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_assign_unique_ids_to_concurrent_creates(ctx: &TestContext) {
    let requests = (0..8).map(|index| async move {
        let body = json!({"title": format!("Task {}", index), "description": "body"});
        ctx.client.post("/tasks/", &body).await
    });

    let responses = futures::future::join_all(requests).await;

    let mut ids: Vec<i64> = responses
        .into_iter()
        .map(|response| {
            let response = response.unwrap();
            response.assert_status(StatusCode::CREATED);
            response.json()["id"].as_i64().unwrap()
        })
        .collect();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), 8);
}
