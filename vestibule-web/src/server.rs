//! Server bootstrap

use crate::{create_app, state::AppState};
use std::sync::Arc;
use tracing::info;
use vestibule_app::{LogMailer, Mailer};
use vestibule_core::{AppConfig, VestibuleError, VestibuleResult};

/// Connect, prepare the schema and serve until shutdown
pub async fn run(config: AppConfig) -> VestibuleResult<()> {
    let mailer: Arc<dyn Mailer> = Arc::new(LogMailer);
    let state = AppState::new(config.clone(), mailer).await?;
    let app = create_app(state);

    let address = config.address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .map_err(|e| VestibuleError::internal("Failed to bind server address", Some(Box::new(e))))?;

    info!(%address, "vestibule listening");
    axum::serve(listener, app)
        .await
        .map_err(|e| VestibuleError::internal("Server error", Some(Box::new(e))))
}
