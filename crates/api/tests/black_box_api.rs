use msstudy_infra::Config;
use reqwest::StatusCode;
use serde_json::{json, Value};

const DEFAULT_DEMOFIELD: &str = "AAAAAAAAAA";
const UPDATED_DEMOFIELD: &str = "BBBBBBBBBB";

struct TestServer {
    base_url: String,
    client: reqwest::Client,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        // Same router as prod (in-memory store), bound to an ephemeral port.
        let app = msstudy_api::app::build_app(&Config::default())
            .await
            .expect("failed to build app");
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url,
            client: reqwest::Client::new(),
            handle,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn create(&self, demofield: &str) -> Value {
        let res = self
            .client
            .post(self.url("/api/demos"))
            .json(&json!({ "demofield": demofield }))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::CREATED);
        res.json().await.unwrap()
    }

    async fn list(&self) -> Vec<Value> {
        let res = self.client.get(self.url("/api/demos")).send().await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        res.json().await.unwrap()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[tokio::test]
async fn health_is_public() {
    let srv = TestServer::spawn().await;
    let res = srv.client.get(srv.url("/health")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn create_demo_assigns_id_and_location() {
    let srv = TestServer::spawn().await;
    let size_before = srv.list().await.len();

    let res = srv
        .client
        .post(srv.url("/api/demos"))
        .json(&json!({ "demofield": DEFAULT_DEMOFIELD }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);

    let location = res.headers()["location"].to_str().unwrap().to_string();
    let alert = res.headers()["x-msstudyapp-alert"].to_str().unwrap().to_string();
    let body: Value = res.json().await.unwrap();
    let id = body["id"].as_i64().unwrap();

    assert_eq!(location, format!("/api/demos/{id}"));
    assert_eq!(alert, format!("A new msstudyDemo is created with identifier {id}"));
    assert_eq!(body["demofield"], DEFAULT_DEMOFIELD);

    let demos = srv.list().await;
    assert_eq!(demos.len(), size_before + 1);
    assert_eq!(demos.last().unwrap()["demofield"], DEFAULT_DEMOFIELD);
}

#[tokio::test]
async fn created_ids_are_unique_and_increasing() {
    let srv = TestServer::spawn().await;

    let mut last = 0;
    for _ in 0..5 {
        let id = srv.create(DEFAULT_DEMOFIELD).await["id"].as_i64().unwrap();
        assert!(id > last, "id {id} should follow {last}");
        last = id;
    }
}

#[tokio::test]
async fn create_demo_with_existing_id_is_rejected() {
    let srv = TestServer::spawn().await;
    srv.create(DEFAULT_DEMOFIELD).await;
    let size_before = srv.list().await.len();

    let res = srv
        .client
        .post(srv.url("/api/demos"))
        .json(&json!({ "id": 1, "demofield": DEFAULT_DEMOFIELD }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(res.headers()["x-msstudyapp-error"], "error.idexists");

    let body: Value = res.json().await.unwrap();
    assert_eq!(body["errorKey"], "idexists");
    assert_eq!(body["entityName"], "msstudyDemo");

    assert_eq!(srv.list().await.len(), size_before);
}

#[tokio::test]
async fn get_all_demos_supports_sort() {
    let srv = TestServer::spawn().await;
    let first = srv.create(DEFAULT_DEMOFIELD).await["id"].as_i64().unwrap();
    let second = srv.create(UPDATED_DEMOFIELD).await["id"].as_i64().unwrap();

    let res = srv
        .client
        .get(srv.url("/api/demos?sort=id,desc"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let demos: Vec<Value> = res.json().await.unwrap();

    let ids: Vec<i64> = demos.iter().map(|d| d["id"].as_i64().unwrap()).collect();
    assert_eq!(ids, vec![second, first]);
    assert!(demos.iter().any(|d| d["demofield"] == DEFAULT_DEMOFIELD));
}

#[tokio::test]
async fn get_demo_returns_stored_entity() {
    let srv = TestServer::spawn().await;
    let created = srv.create(DEFAULT_DEMOFIELD).await;
    let id = created["id"].as_i64().unwrap();

    let res = srv
        .client
        .get(srv.url(&format!("/api/demos/{id}")))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, json!({ "id": id, "demofield": DEFAULT_DEMOFIELD }));
}

#[tokio::test]
async fn get_non_existing_demo_is_not_found() {
    let srv = TestServer::spawn().await;
    let res = srv
        .client
        .get(srv.url(&format!("/api/demos/{}", i64::MAX)))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn update_demo_changes_field_in_place() {
    let srv = TestServer::spawn().await;
    let created = srv.create(DEFAULT_DEMOFIELD).await;
    let id = created["id"].as_i64().unwrap();
    let size_before = srv.list().await.len();

    let res = srv
        .client
        .put(srv.url("/api/demos"))
        .json(&json!({ "id": id, "demofield": UPDATED_DEMOFIELD }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(
        res.headers()["x-msstudyapp-alert"],
        format!("A msstudyDemo is updated with identifier {id}").as_str()
    );
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["demofield"], UPDATED_DEMOFIELD);

    let demos = srv.list().await;
    assert_eq!(demos.len(), size_before);
    assert_eq!(demos.last().unwrap()["demofield"], UPDATED_DEMOFIELD);
}

#[tokio::test]
async fn update_demo_without_id_is_rejected() {
    let srv = TestServer::spawn().await;
    srv.create(DEFAULT_DEMOFIELD).await;
    let before = srv.list().await;

    let res = srv
        .client
        .put(srv.url("/api/demos"))
        .json(&json!({ "demofield": UPDATED_DEMOFIELD }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["errorKey"], "idnull");

    assert_eq!(srv.list().await, before);
}

#[tokio::test]
async fn delete_demo_removes_row() {
    let srv = TestServer::spawn().await;
    let id = srv.create(DEFAULT_DEMOFIELD).await["id"].as_i64().unwrap();
    let size_before = srv.list().await.len();

    let res = srv
        .client
        .delete(srv.url(&format!("/api/demos/{id}")))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);
    assert_eq!(srv.list().await.len(), size_before - 1);
}

#[tokio::test]
async fn delete_of_missing_demo_is_no_content() {
    let srv = TestServer::spawn().await;
    srv.create(DEFAULT_DEMOFIELD).await;
    let size_before = srv.list().await.len();

    let res = srv
        .client
        .delete(srv.url("/api/demos/999999"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);
    assert_eq!(srv.list().await.len(), size_before);
}

#[tokio::test]
async fn demo_lifecycle_create_get_delete_get() {
    let srv = TestServer::spawn().await;

    let created = srv.create(DEFAULT_DEMOFIELD).await;
    let id = created["id"].as_i64().unwrap();
    assert_eq!(created["demofield"], DEFAULT_DEMOFIELD);

    let res = srv
        .client
        .get(srv.url(&format!("/api/demos/{id}")))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let fetched: Value = res.json().await.unwrap();
    assert_eq!(fetched, created);

    let res = srv
        .client
        .delete(srv.url(&format!("/api/demos/{id}")))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let res = srv
        .client
        .get(srv.url(&format!("/api/demos/{id}")))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}
