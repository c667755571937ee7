use payment_service::{config::PaymentConfig, services::init_metrics, Application};
use service_core::observability::init_tracing;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = PaymentConfig::load()?;

    init_tracing(
        &config.service_name,
        &config.common.log_level,
        config.common.otlp_endpoint.as_deref(),
    );
    init_metrics();

    let application = Application::build(config).await?;
    application.run_until_stopped().await?;

    tracing::info!("Payment service stopped");
    Ok(())
}
