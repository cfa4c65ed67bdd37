#![allow(dead_code)]

use course_service::config::CourseConfig;
use course_service::services::providers::mock::MockProvider;
use course_service::startup::Application;
use std::sync::Arc;
use std::time::Duration;

pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub provider: Arc<MockProvider>,
    pub client: reqwest::Client,
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with(MockProvider::new()).await
    }

    pub async fn spawn_with(provider: MockProvider) -> Self {
        // Mock provider, random port
        let config = CourseConfig::for_mock_provider();
        let provider = Arc::new(provider);

        let app = Application::build_with_provider(config, provider.clone())
            .await
            .expect("Failed to build test application");

        let port = app.port();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for the server to be ready by polling the health endpoint
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .expect("Failed to build HTTP client");
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }

        TestApp {
            address,
            port,
            provider,
            client,
        }
    }

    pub async fn post_course(&self, body: &serde_json::Value) -> reqwest::Response {
        self.client
            .post(format!("{}/courses", self.address))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn get_course(&self, id: &str) -> reqwest::Response {
        self.client
            .get(format!("{}/courses", self.address))
            .query(&[("id", id)])
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn list_courses(&self) -> reqwest::Response {
        self.client
            .get(format!("{}/courses", self.address))
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn put_course(&self, id: &str, body: &serde_json::Value) -> reqwest::Response {
        self.client
            .put(format!("{}/courses/{}", self.address, id))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn delete_course(&self, id: &str) -> reqwest::Response {
        self.client
            .delete(format!("{}/courses/{}", self.address, id))
            .send()
            .await
            .expect("Failed to execute request")
    }
}

pub fn course_body(id: &str, description: &str) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "course_description": description,
        "number_of_words": "50",
        "learner_type": "beginners"
    })
}
