use churn_serve::utils::error::ErrorSeverity;
use churn_serve::utils::{logger, validation::Validate};
use churn_serve::{CliConfig, ModelLoader, PredictionService, ServeError, Settings, UriModelStore};
use clap::Parser;
use std::sync::Arc;

fn exit_with(e: &ServeError, context: &str) -> ! {
    tracing::error!(
        "❌ {}: {} (Category: {:?}, Severity: {:?})",
        context,
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    let exit_code = match e.severity() {
        ErrorSeverity::Low | ErrorSeverity::High => 1,
        ErrorSeverity::Medium => 2, // 可重試
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    let settings = match Settings::resolve(&cli) {
        Ok(settings) => settings,
        Err(e) => {
            logger::init_logger(cli.log_format.unwrap_or_default(), cli.verbose);
            exit_with(&e, "Configuration could not be loaded");
        }
    };

    logger::init_logger(settings.log_format, settings.verbose);
    tracing::info!("Starting churn-serve");
    tracing::debug!("Effective settings: {:?}", settings);

    if let Err(e) = settings.validate() {
        exit_with(&e, "Configuration validation failed");
    }

    let store = match UriModelStore::from_tracking_uri(settings.model.tracking_uri.as_deref()) {
        Ok(store) => store,
        Err(e) => exit_with(&e, "Tracking store could not be configured"),
    };
    let mut loader = ModelLoader::new(Arc::new(store));
    if let Some(timeout) = settings.model.load_timeout() {
        loader = loader.with_timeout(timeout);
    }

    // A configured model that fails to load must stop the process before it serves.
    let service = match PredictionService::activate(settings.model.uri.clone(), &loader).await {
        Ok(service) => service,
        Err(e) => exit_with(&e, "Model load failed"),
    };
    tracing::info!("Service state: {:?}", service.state());

    churn_serve::server::start(service, &settings.server).await
}
