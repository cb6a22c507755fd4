use crate::action::SourcedAction;
use crate::document::Document;
use crate::provider::{ProviderError, ProviderErrorKind, ProviderResult};
use crate::registry::{ProviderRegistry, RegisteredProvider};
use lsp_types::{CodeAction, CodeActionContext, Range};
use std::panic::AssertUnwindSafe;
use std::sync::mpsc;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

#[derive(Clone, Debug)]
pub struct EngineOptions {
    /// Shared deadline for one aggregation round. Providers run concurrently,
    /// so this bounds the whole round, not each provider in sequence.
    pub provider_timeout: Duration,
    pub max_actions_per_provider: usize,
    pub max_actions: usize,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            provider_timeout: Duration::from_secs(2),
            max_actions_per_provider: 256,
            max_actions: 1024,
        }
    }
}

/// Queries every provider matching a document and flattens their actions
/// into one ordered collection.
#[derive(Clone, Debug)]
pub struct CodeActionEngine {
    registry: Arc<ProviderRegistry>,
    options: EngineOptions,
}

struct InFlight {
    provider: RegisteredProvider,
    token: CancellationToken,
    rx: mpsc::Receiver<ProviderResult<Vec<CodeAction>>>,
}

impl CodeActionEngine {
    pub fn new(registry: Arc<ProviderRegistry>) -> Self {
        Self::with_options(registry, EngineOptions::default())
    }

    pub fn with_options(registry: Arc<ProviderRegistry>, options: EngineOptions) -> Self {
        Self { registry, options }
    }

    pub fn registry(&self) -> &Arc<ProviderRegistry> {
        &self.registry
    }

    /// Collect actions from every provider matching `document`.
    ///
    /// All provider calls are launched before any is joined, each on its own
    /// worker thread with a child of `cancel`. Results are collected
    /// positionally in registration order, never by completion order, so the
    /// output is deterministic regardless of timing. A provider that fails,
    /// panics, or misses the deadline contributes nothing; only cancelling
    /// `cancel` itself empties the whole result.
    ///
    /// Pure query: no side effects, never fails.
    pub fn aggregate(
        &self,
        document: &Document,
        range: Range,
        context: &CodeActionContext,
        cancel: &CancellationToken,
    ) -> Vec<SourcedAction> {
        if cancel.is_cancelled() {
            return Vec::new();
        }

        let providers = self.registry.snapshot_for(document);
        tracing::debug!(
            target: "mend.actions",
            uri = %document.uri.as_str(),
            providers = providers.len(),
            "aggregating code actions"
        );

        let mut in_flight = Vec::with_capacity(providers.len());
        for provider in providers {
            in_flight.push(launch(provider, document, range, context, cancel));
        }

        let deadline = Instant::now() + self.options.provider_timeout;
        let mut out: Vec<SourcedAction> = Vec::new();
        let mut calls = in_flight.into_iter();
        while let Some(call) = calls.next() {
            let Some(result) = join(&call, deadline, cancel) else {
                // Global cancellation; drop everything collected so far.
                return Vec::new();
            };
            match result {
                Ok(mut actions) => {
                    actions.truncate(self.options.max_actions_per_provider);
                    out.extend(
                        actions
                            .into_iter()
                            .map(|action| SourcedAction::new(action, call.provider.clone())),
                    );
                    if out.len() >= self.options.max_actions {
                        out.truncate(self.options.max_actions);
                        // The unjoined calls will never be collected; let
                        // their workers wind down instead of running on.
                        for unjoined in calls.by_ref() {
                            unjoined.token.cancel();
                        }
                        break;
                    }
                }
                Err(err) => {
                    tracing::warn!(
                        target: "mend.actions",
                        provider = call.provider.name(),
                        error = %err,
                        "code action provider failed"
                    );
                }
            }
        }
        out
    }
}

fn launch(
    provider: RegisteredProvider,
    document: &Document,
    range: Range,
    context: &CodeActionContext,
    cancel: &CancellationToken,
) -> InFlight {
    let token = cancel.child_token();
    let (tx, rx) = mpsc::channel();

    let job_provider = provider.clone();
    let job_document = document.clone();
    let job_context = context.clone();
    let job_token = token.clone();
    std::thread::spawn(move || {
        let result = std::panic::catch_unwind(AssertUnwindSafe(|| {
            job_provider
                .provider()
                .provide_actions(&job_document, range, &job_context, &job_token)
        }))
        .unwrap_or_else(|_| {
            Err(ProviderError::new(
                ProviderErrorKind::Panic,
                "provider panicked",
            ))
        });
        let _ = tx.send(result);
    });

    InFlight {
        provider,
        token,
        rx,
    }
}

/// Wait for one in-flight provider call, polling the shared token so global
/// cancellation is noticed promptly. Returns `None` on global cancellation.
fn join(
    call: &InFlight,
    deadline: Instant,
    cancel: &CancellationToken,
) -> Option<ProviderResult<Vec<CodeAction>>> {
    let poll_interval = Duration::from_millis(5);
    loop {
        if cancel.is_cancelled() {
            return None;
        }

        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            // An earlier straggler may have burned the whole budget while
            // this provider finished in time; its result is already queued.
            if let Ok(result) = call.rx.try_recv() {
                return Some(result);
            }
            // The worker thread cannot be forcibly terminated; cancel its
            // token and expect it to wind down on its own.
            call.token.cancel();
            return Some(Err(ProviderError::new(
                ProviderErrorKind::Timeout,
                "provider missed the aggregation deadline",
            )));
        }

        match call.rx.recv_timeout(remaining.min(poll_interval)) {
            Ok(result) => return Some(result),
            Err(mpsc::RecvTimeoutError::Timeout) => continue,
            Err(mpsc::RecvTimeoutError::Disconnected) => {
                return Some(Err(ProviderError::new(
                    ProviderErrorKind::Panic,
                    "provider dropped without a result",
                )));
            }
        }
    }
}
