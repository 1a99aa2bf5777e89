#![allow(dead_code)]

use axum_test::multipart::{MultipartForm, Part};
use axum_test::{TestResponse, TestServer};
use std::collections::HashMap;
use std::sync::Arc;
use tempfile::TempDir;
use tubely_api::setup::routes::setup_routes;
use tubely_api::setup::storage::{setup_thumbnail_store, setup_video_storage};
use tubely_api::AppState;
use tubely_core::auth::make_jwt;
use tubely_core::models::Video;
use tubely_core::Config;
use tubely_db::InMemoryVideoRepository;
use tubely_processing::test_helpers::FakeProber;
use uuid::Uuid;

pub const JWT_SECRET: &str = "integration-test-secret";

pub struct TestApp {
    pub server: TestServer,
    pub repo: InMemoryVideoRepository,
    pub prober: Arc<FakeProber>,
    pub config: Config,
    pub user_id: Uuid,
    pub token: String,
    // Dropped last; holds ASSETS_ROOT
    pub assets: TempDir,
}

pub async fn spawn_app(prober: FakeProber) -> TestApp {
    spawn_app_with(prober, &[]).await
}

/// Router over in-memory state: local storage in a temp dir, fake prober, no database.
pub async fn spawn_app_with(prober: FakeProber, overrides: &[(&str, &str)]) -> TestApp {
    let assets = TempDir::new().expect("create assets dir");

    let mut vars: HashMap<String, String> = HashMap::new();
    vars.insert("DATABASE_URL".into(), "postgres://localhost/tubely_test".into());
    vars.insert("JWT_SECRET".into(), JWT_SECRET.into());
    vars.insert("STORAGE_BACKEND".into(), "local".into());
    vars.insert(
        "ASSETS_ROOT".into(),
        assets.path().to_string_lossy().to_string(),
    );
    for (key, value) in overrides {
        vars.insert(key.to_string(), value.to_string());
    }
    let config = Config::from_lookup(|key| vars.get(key).cloned()).expect("test config");

    let repo = InMemoryVideoRepository::new();
    let prober = Arc::new(prober);
    let video_storage = setup_video_storage(&config).await.expect("video storage");
    let thumbnails = setup_thumbnail_store(&config).await.expect("thumbnail store");

    let state = Arc::new(AppState::new(
        config.clone(),
        Arc::new(repo.clone()),
        video_storage,
        thumbnails,
        prober.clone(),
    ));
    let router = setup_routes(state).expect("router");
    let server = TestServer::new(router).expect("test server");

    let user_id = Uuid::new_v4();
    let token = token_for(user_id);

    TestApp {
        server,
        repo,
        prober,
        config,
        user_id,
        token,
        assets,
    }
}

pub fn token_for(user_id: Uuid) -> String {
    make_jwt(user_id, JWT_SECRET, chrono::Duration::hours(1)).expect("sign token")
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}

impl TestApp {
    pub async fn create_video(&self, title: &str) -> Video {
        let response = self
            .server
            .post("/api/videos")
            .add_header("Authorization", bearer(&self.token))
            .json(&serde_json::json!({ "title": title, "description": "test clip" }))
            .await;
        response.json::<Video>()
    }

    pub async fn upload_video(&self, video_id: Uuid, form: MultipartForm) -> TestResponse {
        self.upload_video_as(video_id, &self.token, form).await
    }

    pub async fn upload_video_as(
        &self,
        video_id: Uuid,
        token: &str,
        form: MultipartForm,
    ) -> TestResponse {
        self.server
            .post(&format!("/api/video_upload/{}", video_id))
            .add_header("Authorization", bearer(token))
            .multipart(form)
            .await
    }

    pub async fn upload_thumbnail(&self, video_id: Uuid, form: MultipartForm) -> TestResponse {
        self.upload_thumbnail_as(video_id, &self.token, form).await
    }

    pub async fn upload_thumbnail_as(
        &self,
        video_id: Uuid,
        token: &str,
        form: MultipartForm,
    ) -> TestResponse {
        self.server
            .post(&format!("/api/thumbnail_upload/{}", video_id))
            .add_header("Authorization", bearer(token))
            .multipart(form)
            .await
    }
}

pub fn video_form(bytes: Vec<u8>, content_type: &str) -> MultipartForm {
    MultipartForm::new().add_part(
        "video",
        Part::bytes(bytes)
            .file_name("boots.mp4")
            .mime_type(content_type),
    )
}

pub fn thumbnail_form(bytes: Vec<u8>, content_type: &str) -> MultipartForm {
    MultipartForm::new().add_part(
        "thumbnail",
        Part::bytes(bytes)
            .file_name("boots.png")
            .mime_type(content_type),
    )
}

pub fn error_message(response: &TestResponse) -> String {
    let body: serde_json::Value = response.json();
    body["error"].as_str().unwrap_or_default().to_string()
}

pub fn error_code(response: &TestResponse) -> String {
    let body: serde_json::Value = response.json();
    body["code"].as_str().unwrap_or_default().to_string()
}
