use emos::api::{create_router, BackendState};
use emos::client::{
    resolve_backend_url, BackendClient, BackendError, HttpProbe, ProcessBackend, ResolveOptions,
};
use emos::config::Timings;
use emos::shell::loader::BuiltinModules;
use emos::shell::panel::ResultSource;
use emos::shell::registry::FeatureRegistry;
use emos::shell::Shell;
use emos_core::models::*;

/// Serve the backend on an ephemeral port and answer its base URL.
async fn spawn_backend() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind");
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, create_router(BackendState::new()))
            .await
            .unwrap();
    });
    format!("http://{}", addr)
}

/// A base URL nothing listens on.
async fn dead_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

mod backend_client {
    use super::*;

    #[tokio::test]
    async fn health_and_catalog() {
        let client = BackendClient::new(spawn_backend().await);

        client.health().await.expect("health failed");
        let features = client.features().await.unwrap();
        assert_eq!(features.len(), 16);
    }

    #[tokio::test]
    async fn submit_returns_results_with_logs() {
        let client = BackendClient::new(spawn_backend().await);

        let (results, logs) = client
            .submit(FeatureId(4), &PanelInputs::new())
            .await
            .unwrap()
            .into_parts();

        assert_eq!(results["analysisStatus"], "Analysis completed - 94.8% accuracy - server");
        assert_eq!(logs.len(), 5);
        assert_eq!(logs[0].message, "Initializing material characterization...");
    }

    #[tokio::test]
    async fn not_found_carries_the_server_message() {
        let client = BackendClient::new(spawn_backend().await);

        let err = client
            .submit(FeatureId(77), &PanelInputs::new())
            .await
            .unwrap_err();

        match err {
            BackendError::NotFound(message) => assert_eq!(message, "Feature 77 not found"),
            other => panic!("expected NotFound, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn toggle_round_trip() {
        let client = BackendClient::new(spawn_backend().await);

        let message = client.toggle_generator("mattergen", true).await.unwrap();
        assert_eq!(message, "Generator 'mattergen' activated");

        let err = client.toggle_generator("molgan", true).await.unwrap_err();
        assert!(matches!(err, BackendError::BadRequest(_)));
    }

    #[tokio::test]
    async fn unreachable_backend_is_an_http_error() {
        let client = BackendClient::new(dead_url().await);

        let err = client
            .submit(FeatureId(1), &PanelInputs::new())
            .await
            .unwrap_err();
        assert!(matches!(err, BackendError::Http(_)));
    }
}

mod url_resolution {
    use super::*;

    #[tokio::test]
    async fn same_origin_backend_is_found_by_probing() {
        let base = spawn_backend().await;
        let options = ResolveOptions {
            origin: Some(format!("{}/index.html", base)),
            ..Default::default()
        };

        let url = resolve_backend_url(&options, &HttpProbe::new()).await;

        assert_eq!(url, base);
    }

    #[tokio::test]
    async fn silent_origin_falls_back_to_dev_port() {
        let dead = dead_url().await;
        let options = ResolveOptions {
            origin: Some(dead),
            ..Default::default()
        };

        let url = resolve_backend_url(&options, &HttpProbe::new()).await;

        assert_eq!(url, "http://127.0.0.1:5001");
    }
}

mod shell_against_live_backend {
    use super::*;

    #[tokio::test]
    async fn material_search_uses_backend_results() {
        let client = BackendClient::new(spawn_backend().await);
        let mut shell = Shell::new(
            FeatureRegistry::builtin(),
            BuiltinModules,
            client,
            Timings::instant(),
        );

        shell.open_feature(FeatureId(1)).await;
        shell.set_input("materialName", "Al2O3").unwrap();
        assert!(shell.start_processing().unwrap());
        shell.wait_for_processing().await;

        let state = shell.current().unwrap().snapshot();
        assert_eq!(state.source, Some(ResultSource::Backend));
        let result = state.result.unwrap();
        assert_eq!(result.field("materialsCount"), Some("42 materials found - server"));
        assert_eq!(result.field("topMatch"), Some("Al2O3 - server"));
    }

    #[tokio::test]
    async fn band_structure_falls_back_to_local_mock() {
        let client = BackendClient::new(spawn_backend().await);
        let mut shell = Shell::new(
            FeatureRegistry::builtin(),
            BuiltinModules,
            client,
            Timings::instant(),
        );

        shell.open_feature(FeatureId(12)).await;
        shell.start_processing().unwrap();
        shell.wait_for_processing().await;

        let state = shell.current().unwrap().snapshot();
        assert_eq!(state.source, Some(ResultSource::Local));
        assert_eq!(
            state.result.unwrap().field("calculationStatus"),
            Some("Band structure calculated")
        );
    }
}
