//! Picking the backend base URL.
//!
//! Precedence: explicit configuration, then the global override, then a
//! same-origin probe, then the development backend on port 5001. When the
//! shell is hosted on one of the usual static dev-server ports the dev backend
//! is probed for diagnostics and used whatever the probe says.

use std::future::Future;

use reqwest::{Client, Url};

use super::DEFAULT_URL;
use crate::api::DEFAULT_PORT;

/// Ports static dev servers usually run on.
pub const DEV_STATIC_PORTS: [u16; 4] = [5500, 8000, 8080, 5173];

/// Liveness check against `{base}/api/health`.
pub trait HealthProbe {
    fn probe(&self, base_url: &str) -> impl Future<Output = bool> + Send;
}

/// Probes over HTTP; any 2xx counts as alive.
#[derive(Debug, Clone, Default)]
pub struct HttpProbe {
    client: Client,
}

impl HttpProbe {
    pub fn new() -> Self {
        Self::default()
    }
}

impl HealthProbe for HttpProbe {
    async fn probe(&self, base_url: &str) -> bool {
        let url = format!("{}/api/health", base_url);
        match self.client.get(&url).send().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                tracing::debug!("Health probe {} failed: {}", url, e);
                false
            }
        }
    }
}

/// Inputs to URL resolution, highest precedence first.
#[derive(Debug, Clone, Default)]
pub struct ResolveOptions {
    /// Configured backend (`backend_url` / `--backend`).
    pub explicit: Option<String>,
    /// Global override (`EMOS_BACKEND_BASE_URL`).
    pub override_url: Option<String>,
    /// Where the shell is considered hosted.
    pub origin: Option<String>,
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.trim_end_matches('/').to_string())
}

/// Resolve the backend base URL. Never fails: the dev backend is the last
/// resort.
pub async fn resolve_backend_url(options: &ResolveOptions, probe: &impl HealthProbe) -> String {
    if let Some(url) = non_empty(&options.explicit) {
        tracing::debug!("Using configured backend {}", url);
        return url;
    }
    if let Some(url) = non_empty(&options.override_url) {
        tracing::debug!("Using backend override {}", url);
        return url;
    }

    let Some(origin) = non_empty(&options.origin).and_then(|o| Url::parse(&o).ok()) else {
        return DEFAULT_URL.to_string();
    };
    let Some(host) = origin.host_str() else {
        return DEFAULT_URL.to_string();
    };

    let dev_backend = format!("{}://{}:{}", origin.scheme(), host, DEFAULT_PORT);
    let port = origin.port_or_known_default();

    if port.is_some_and(|p| DEV_STATIC_PORTS.contains(&p)) {
        if probe.probe(&dev_backend).await {
            tracing::info!("Dev backend reachable at {}", dev_backend);
        } else {
            tracing::warn!("Dev backend at {} did not answer the health probe", dev_backend);
        }
        return dev_backend;
    }

    let same_origin = origin.origin().ascii_serialization();
    if probe.probe(&same_origin).await {
        return same_origin;
    }
    tracing::warn!(
        "No backend on {}, falling back to {}",
        same_origin,
        dev_backend
    );
    dev_backend
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    /// Answers from a fixed list of live URLs and records every probe.
    struct FakeProbe {
        alive: Vec<&'static str>,
        probed: Mutex<Vec<String>>,
    }

    impl FakeProbe {
        fn new(alive: &[&'static str]) -> Self {
            Self {
                alive: alive.to_vec(),
                probed: Mutex::new(Vec::new()),
            }
        }

        fn probed(&self) -> Vec<String> {
            self.probed.lock().unwrap().clone()
        }
    }

    impl HealthProbe for FakeProbe {
        async fn probe(&self, base_url: &str) -> bool {
            self.probed.lock().unwrap().push(base_url.to_string());
            self.alive.contains(&base_url)
        }
    }

    fn hosted_at(origin: &str) -> ResolveOptions {
        ResolveOptions {
            origin: Some(origin.to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn explicit_configuration_wins() {
        let probe = FakeProbe::new(&[]);
        let options = ResolveOptions {
            explicit: Some("http://api.example.com/".into()),
            override_url: Some("http://override:9000".into()),
            origin: Some("http://localhost:8080".into()),
        };
        assert_eq!(
            resolve_backend_url(&options, &probe).await,
            "http://api.example.com"
        );
        assert!(probe.probed().is_empty());
    }

    #[tokio::test]
    async fn override_beats_probing() {
        let probe = FakeProbe::new(&[]);
        let options = ResolveOptions {
            explicit: Some("  ".into()),
            override_url: Some("http://override:9000".into()),
            origin: Some("http://localhost:3000".into()),
        };
        assert_eq!(
            resolve_backend_url(&options, &probe).await,
            "http://override:9000"
        );
    }

    #[tokio::test]
    async fn dev_port_uses_dev_backend_even_when_probe_fails() {
        let probe = FakeProbe::new(&[]);
        let url = resolve_backend_url(&hosted_at("http://localhost:5500/index.html"), &probe).await;
        assert_eq!(url, "http://localhost:5001");
        assert_eq!(probe.probed(), vec!["http://localhost:5001".to_string()]);
    }

    #[tokio::test]
    async fn same_origin_when_it_answers() {
        let probe = FakeProbe::new(&["https://emos.example.org"]);
        let url = resolve_backend_url(&hosted_at("https://emos.example.org/app/"), &probe).await;
        assert_eq!(url, "https://emos.example.org");
    }

    #[tokio::test]
    async fn dev_backend_when_same_origin_is_silent() {
        let probe = FakeProbe::new(&[]);
        let url = resolve_backend_url(&hosted_at("http://10.0.0.5:3000"), &probe).await;
        assert_eq!(url, "http://10.0.0.5:5001");
        assert_eq!(probe.probed(), vec!["http://10.0.0.5:3000".to_string()]);
    }

    #[tokio::test]
    async fn no_origin_means_local_dev_backend() {
        let probe = FakeProbe::new(&[]);
        let url = resolve_backend_url(&ResolveOptions::default(), &probe).await;
        assert_eq!(url, DEFAULT_URL);
    }
}
