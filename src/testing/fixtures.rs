use tokio::net::TcpListener;

use crate::config::Settings;
use crate::server::{AppState, build_router};

/// Settings with both vendor keys set and base URLs pointed at the given mocks.
pub fn test_settings(elevenlabs_base: &str, exa_base: &str) -> Settings {
    let mut settings = Settings::default();
    settings.elevenlabs.key = "test-elevenlabs-key".into();
    settings.elevenlabs.base_url = elevenlabs_base.into();
    settings.exa.key = "test-exa-key".into();
    settings.exa.base_url = exa_base.into();
    settings.server.upstream_timeout_secs = 5;
    settings
}

/// Serve the full gateway router on an ephemeral port and return its base URL.
pub async fn spawn_gateway(settings: Settings) -> String {
    let app = build_router(AppState::new(settings).expect("test client should build"));
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}
