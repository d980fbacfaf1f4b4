use crate::body::{BodyKind, classify_body};
use crate::candidate::EndpointCandidate;
use crate::error::{ProbeFailure, Result};
use crate::pacer::Pacer;
use crate::policy::{ProbeConfig, RetryPolicy, WeakBodyPolicy};
use crate::transport::{HttpTransport, Transport, TransportResponse};
use crate::verdict::{LiveSignal, ProbeVerdict};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Outcome of a single attempt.
enum Step {
    Live(LiveSignal, u16),
    Retry(ProbeFailure),
}

/// Bounded-retry liveness checker for API endpoints.
///
/// The prober holds no per-candidate state: identity rotation is derived from the
/// attempt counter plus a caller-supplied offset, so one prober can be shared by
/// concurrent probes.
pub struct Prober<T: Transport> {
    transport: T,
    config: ProbeConfig,
    pacer: Option<Arc<Pacer>>,
}

impl Prober<HttpTransport> {
    pub fn http(config: ProbeConfig) -> Result<Self> {
        let transport = HttpTransport::new(&config)?;
        Ok(Self::new(transport).with_config(config))
    }
}

impl<T: Transport> Prober<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            config: ProbeConfig::default(),
            pacer: None,
        }
    }

    pub fn with_config(mut self, config: ProbeConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_pacer(mut self, pacer: Arc<Pacer>) -> Self {
        self.pacer = Some(pacer);
        self
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Probes a bare URL; the verdict's candidate id is the URL itself.
    pub async fn probe(&self, url: &str, policy: &RetryPolicy) -> ProbeVerdict {
        self.run(url, url, policy, 0).await
    }

    /// Probes a candidate with the configured retry policy. `offset` shifts the
    /// identity rotation so neighbouring candidates start on different profiles.
    pub async fn probe_candidate(&self, candidate: &EndpointCandidate, offset: usize) -> ProbeVerdict {
        self.run(&candidate.id, &candidate.url, &self.config.retry, offset)
            .await
    }

    async fn run(&self, id: &str, url: &str, policy: &RetryPolicy, offset: usize) -> ProbeVerdict {
        let max = policy.max_attempts.max(1);
        let mut last_status = None;
        let mut last_failure: Option<ProbeFailure> = None;

        for attempt in 0..max {
            let identity = self.config.identities.pick(offset + attempt as usize);

            if let Some(ref pacer) = self.pacer {
                pacer.acquire().await;
            }

            debug!(url, attempt = attempt + 1, max, "Probing endpoint");

            let step = match self.transport.fetch(url, identity).await {
                Ok(response) => {
                    last_status = Some(response.status);
                    self.judge(&response)
                }
                Err(e) => {
                    last_status = None;
                    Step::Retry(ProbeFailure::Transport {
                        kind: e.kind,
                        message: e.message,
                    })
                }
            };

            let failure = match step {
                Step::Live(signal, status) => {
                    info!(url, attempts = attempt + 1, status, ?signal, "Endpoint is live");
                    return ProbeVerdict::live(
                        id.to_string(),
                        signal,
                        attempt + 1,
                        status,
                        last_failure.map(|f| f.to_string()),
                    );
                }
                Step::Retry(failure) => failure,
            };

            if failure.is_terminal() {
                warn!(url, attempt = attempt + 1, error = %failure, "Endpoint is gone, not retrying");
                return ProbeVerdict::dead(
                    id.to_string(),
                    attempt + 1,
                    last_status,
                    Some(failure.to_string()),
                );
            }

            if attempt + 1 < max {
                // 403 is usually an anti-bot check: switch identity and go again quickly.
                let delay = match failure {
                    ProbeFailure::Rejected { status: 403 } => {
                        policy.sample_jitter(&mut rand::thread_rng())
                    }
                    _ => policy.backoff_delay(attempt, &mut rand::thread_rng()),
                };
                warn!(
                    url,
                    attempt = attempt + 1,
                    max,
                    error = %failure,
                    delay_ms = delay.as_millis() as u64,
                    "Probe attempt failed, retrying"
                );
                last_failure = Some(failure);
                tokio::time::sleep(delay).await;
            } else {
                warn!(url, attempt = attempt + 1, max, error = %failure, "Probe attempts exhausted");
                last_failure = Some(failure);
            }
        }

        ProbeVerdict::dead(
            id.to_string(),
            max,
            last_status,
            last_failure.map(|f| f.to_string()),
        )
    }

    fn judge(&self, response: &TransportResponse) -> Step {
        let status = response.status;
        if !(200..400).contains(&status) {
            return Step::Retry(ProbeFailure::Rejected { status });
        }

        match classify_body(response.content_type.as_deref(), &response.body) {
            BodyKind::Records => Step::Live(LiveSignal::Strong, status),
            BodyKind::Html => Step::Retry(ProbeFailure::AmbiguousBody { status }),
            BodyKind::Structured | BodyKind::Opaque | BodyKind::Empty => match self.config.weak_body {
                WeakBodyPolicy::Accept => Step::Live(LiveSignal::Weak, status),
                WeakBodyPolicy::Retry => Step::Retry(ProbeFailure::AmbiguousBody { status }),
            },
        }
    }
}
