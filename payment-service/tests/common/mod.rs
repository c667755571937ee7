use payment_service::config::PaymentConfig;
use payment_service::startup::Application;
use service_core::config::Config as CoreConfig;

pub struct TestApp {
    pub address: String,
    pub client: reqwest::Client,
}

impl TestApp {
    pub async fn spawn() -> Self {
        let config = PaymentConfig {
            common: CoreConfig {
                host: "127.0.0.1".to_string(),
                port: 0, // Random port
                log_level: "error".to_string(),
                otlp_endpoint: None,
            },
            service_name: "payment-service-test".to_string(),
        };

        let app = Application::build(config)
            .await
            .expect("Failed to build test application");

        let port = app.port();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for HTTP server to be ready by polling health endpoint
        let client = reqwest::Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp { address, client }
    }

    /// POST /api/payments with `amount` in the query string.
    pub async fn submit_payment_query(&self, amount: &str) -> reqwest::Response {
        self.client
            .post(format!("{}/api/payments", self.address))
            .query(&[("amount", amount)])
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// POST /api/payments with `amount` in an urlencoded form body.
    pub async fn submit_payment_form(&self, amount: &str) -> reqwest::Response {
        self.client
            .post(format!("{}/api/payments", self.address))
            .form(&[("amount", amount)])
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn get_status(&self) -> reqwest::Response {
        self.client
            .get(format!("{}/api/payments/status", self.address))
            .send()
            .await
            .expect("Failed to execute request")
    }
}
