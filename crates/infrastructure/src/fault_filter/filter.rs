//! Call filter driving a fault-injection session around an async operation.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use application::ports::{MetadataView, RandomSource, TimerPort};
use application::services::{ActiveFaultCounter, FaultInjectionSession, resolve};
use application::InjectedAbort;
use parking_lot::Mutex;
use tokio::sync::oneshot;
use tracing::{debug, info, warn};

use super::{FilterStats, FilterStatsSnapshot, PolicyRegistry};
use crate::adapters::{SeededRandomSource, ThreadRngSource};
use crate::config::{ConfigurationError, FaultInjectionAppConfig};

/// Injects configured delays and aborts into outgoing calls
///
/// All calls through one filter share the active-fault counter that
/// enforces each policy's max-faults ceiling. Pass the same counter to
/// several filters to share the ceiling between them.
pub struct FaultInjectionFilter {
    enabled: bool,
    registry: PolicyRegistry,
    counter: Arc<ActiveFaultCounter>,
    timer: Arc<dyn TimerPort>,
    // None draws from a per-call thread RNG without locking
    random: Option<Mutex<Box<dyn RandomSource>>>,
    stats: FilterStats,
}

impl fmt::Debug for FaultInjectionFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FaultInjectionFilter")
            .field("enabled", &self.enabled)
            .field("registry", &self.registry)
            .field("active_faults", &self.counter.active())
            .field("shared_random_source", &self.random.is_some())
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}

impl FaultInjectionFilter {
    /// Create an enabled filter drawing from the thread RNG
    pub fn new(
        registry: PolicyRegistry,
        counter: Arc<ActiveFaultCounter>,
        timer: Arc<dyn TimerPort>,
    ) -> Self {
        Self {
            enabled: true,
            registry,
            counter,
            timer,
            random: None,
            stats: FilterStats::new(),
        }
    }

    /// Build a filter from loaded configuration
    ///
    /// # Errors
    ///
    /// Returns an error if a policy entry is invalid or duplicated.
    pub fn from_config(
        config: &FaultInjectionAppConfig,
        counter: Arc<ActiveFaultCounter>,
        timer: Arc<dyn TimerPort>,
    ) -> Result<Self, ConfigurationError> {
        let mut filter = Self::new(config.registry()?, counter, timer).with_enabled(config.enabled);
        if let Some(seed) = config.seed {
            filter = filter.with_random_source(SeededRandomSource::new(seed));
        }
        info!(
            enabled = filter.enabled,
            methods = filter.registry.len(),
            has_default = filter.registry.default_policy().is_some(),
            "Fault injection filter created"
        );
        Ok(filter)
    }

    /// Draw every call's decisions from `source`
    ///
    /// The source is shared by all calls, so draws are serialised.
    #[must_use]
    pub fn with_random_source(mut self, source: impl RandomSource + 'static) -> Self {
        self.random = Some(Mutex::new(Box::new(source)));
        self
    }

    /// Whether a custom random source is installed
    pub const fn has_shared_random_source(&self) -> bool {
        self.random.is_some()
    }

    /// Turn the filter on or off
    #[must_use]
    pub const fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Start a session for one call of `method`
    ///
    /// Returns `None` when the filter is disabled or no policy applies.
    /// Callers that run the session themselves must follow the order
    /// documented on [`FaultInjectionSession`].
    pub fn session<M>(&self, method: &str, metadata: &M) -> Option<FaultInjectionSession<'_>>
    where
        M: MetadataView + ?Sized,
    {
        if !self.enabled {
            self.stats.record_call(method, false);
            return None;
        }
        let policy = resolve(self.registry.policy_for(method), metadata);
        self.stats.record_call(method, policy.is_some());
        let policy = policy?;

        let session = match &self.random {
            Some(shared) => FaultInjectionSession::new(
                policy,
                &self.counter,
                self.timer.as_ref(),
                shared.lock().as_mut(),
            ),
            None => FaultInjectionSession::new(
                policy,
                &self.counter,
                self.timer.as_ref(),
                &mut ThreadRngSource,
            ),
        };
        Some(session)
    }

    /// Run `operation` under fault injection
    ///
    /// A rolled delay suspends the call before `operation` starts; a rolled
    /// abort then fails it with [`InjectedAbort`] without running
    /// `operation`. The call's fault slot is held until `operation`
    /// completes. Dropping the returned future cancels a pending delay and
    /// releases the slot.
    pub async fn wrap<M, F, T, E>(&self, method: &str, metadata: &M, operation: F) -> Result<T, E>
    where
        M: MetadataView + Sync + ?Sized,
        F: Future<Output = Result<T, E>>,
        E: From<InjectedAbort>,
    {
        let Some(mut session) = self.session(method, metadata) else {
            return operation.await;
        };
        let rolled = u64::from(session.delay_requested()) + u64::from(session.abort_requested());

        if session.maybe_delay() {
            let delay = session.policy().delay;
            let (resume, resumed) = oneshot::channel();
            session.schedule_next_pick(Box::new(move || {
                let _ = resume.send(());
            }));
            debug!(method, ?delay, "Injecting delay");
            if resumed.await.is_ok() {
                self.stats.record_delay(method, delay);
            } else {
                // the timer dropped the continuation without running it
                warn!(method, ?delay, "Delay timer lost; resuming call without the delay");
                session.abandon_delay();
            }
        }

        let aborted = session.maybe_abort();
        let granted = u64::from(session.delay_requested()) + u64::from(session.abort_requested());
        self.stats
            .record_capacity_skips(method, rolled.saturating_sub(granted));

        if aborted {
            let abort = session.abort_error();
            debug!(method, code = %abort.code(), "Injecting abort");
            self.stats.record_abort(method);
            return Err(abort.into());
        }

        let result = operation.await;
        session.close();
        result
    }

    /// Calls currently holding a fault slot
    pub fn active_faults(&self) -> u32 {
        self.counter.active()
    }

    pub fn stats(&self) -> FilterStatsSnapshot {
        self.stats.snapshot()
    }

    pub fn reset_stats(&self) {
        self.stats.reset();
    }
}
