// src/services/job.rs
use log::{error, info, warn};
use std::sync::Arc;
use std::time::Duration;
use std::sync::{Mutex as StateLock, MutexGuard};
use tokio::sync::Mutex;

use super::assembler::assemble;
use super::dates::{format_horoscope_date, format_timestamp, Clock, SystemClock};
use super::error::JobError;
use super::provider::HoroscopeProvider;
use super::store::HoroscopeStore;
use crate::config::{Config, FailurePolicy};
use crate::models::{JobState, JobStatus, ZodiacSign};

/// Pause taken between signs so the provider is not hammered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimit {
    None,
    FixedInterval(Duration),
}

impl RateLimit {
    pub fn from_millis(ms: u64) -> Self {
        if ms == 0 {
            RateLimit::None
        } else {
            RateLimit::FixedInterval(Duration::from_millis(ms))
        }
    }

    pub async fn wait(&self) {
        if let RateLimit::FixedInterval(interval) = self {
            tokio::time::sleep(*interval).await;
        }
    }
}

/// Outcome of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobReport {
    pub date: String,
    pub timestamp: String,
    pub stored: Vec<ZodiacSign>,
}

impl JobReport {
    pub fn status(&self) -> JobStatus {
        JobStatus::success(format!(
            "Successfully fetched and stored horoscopes for all {} zodiac signs on {}",
            self.stored.len(),
            self.date
        ))
    }
}

impl JobError {
    pub fn status(&self) -> JobStatus {
        JobStatus::failure("Error fetching and storing horoscopes", self.to_string())
    }
}

/// Collapse a run result into the `{statusCode, body}` shape schedulers expect.
pub fn job_status(result: &Result<JobReport, JobError>) -> JobStatus {
    match result {
        Ok(report) => report.status(),
        Err(e) => e.status(),
    }
}

fn lock_state(state: &StateLock<JobState>) -> MutexGuard<'_, JobState> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Marks the run `Failed` if it is dropped before `disarm` is called, e.g.
/// when the caller's future is cancelled mid-run.
struct InterruptedRun<'a> {
    state: &'a StateLock<JobState>,
    armed: bool,
}

impl<'a> InterruptedRun<'a> {
    fn new(state: &'a StateLock<JobState>) -> Self {
        InterruptedRun { state, armed: true }
    }

    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for InterruptedRun<'_> {
    fn drop(&mut self) {
        if self.armed {
            let mut state = lock_state(self.state);
            error!("Horoscope run interrupted while {:?}; marking it failed", *state);
            *state = JobState::Failed;
        }
    }
}

/// Daily ingestion run over all twelve signs.
pub struct HoroscopeJob {
    provider: Arc<dyn HoroscopeProvider>,
    store: Arc<dyn HoroscopeStore>,
    clock: Arc<dyn Clock>,
    rate_limit: RateLimit,
    date_zone: chrono_tz::Tz,
    failure_policy: FailurePolicy,
    run_lock: Mutex<()>,
    state: StateLock<JobState>,
}

impl HoroscopeJob {
    pub fn new(config: &Config, provider: Arc<dyn HoroscopeProvider>, store: Arc<dyn HoroscopeStore>) -> Self {
        HoroscopeJob {
            provider,
            store,
            clock: Arc::new(SystemClock),
            rate_limit: RateLimit::from_millis(config.inter_call_delay_ms),
            date_zone: config.date_zone,
            failure_policy: config.failure_policy,
            run_lock: Mutex::new(()),
            state: StateLock::new(JobState::NotStarted),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_rate_limit(mut self, rate_limit: RateLimit) -> Self {
        self.rate_limit = rate_limit;
        self
    }

    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    pub fn state(&self) -> JobState {
        *lock_state(&self.state)
    }

    pub fn store(&self) -> &Arc<dyn HoroscopeStore> {
        &self.store
    }

    /// Today's horoscope date key in the configured zone.
    pub fn today(&self) -> String {
        format_horoscope_date(self.clock.now(), self.date_zone)
    }

    /// Fetch, assemble and store all twelve signs.
    ///
    /// Signs written before a failure stay written; recovery is re-running the
    /// whole job, which overwrites every record for the date. If the returned
    /// future is dropped part-way, the state is left as `Failed`.
    pub async fn run(&self) -> Result<JobReport, JobError> {
        let _guard = match self.run_lock.try_lock() {
            Ok(guard) => guard,
            Err(_) => {
                warn!("Horoscope run requested while another is in progress");
                return Err(JobError::AlreadyRunning);
            }
        };

        let mut interrupted = InterruptedRun::new(&self.state);
        let result = self.run_all_signs().await;
        interrupted.disarm();

        self.set_state(match result {
            Ok(_) => JobState::Completed,
            Err(_) => JobState::Failed,
        });
        result
    }

    async fn run_all_signs(&self) -> Result<JobReport, JobError> {
        // One date and timestamp for the whole run, even across midnight.
        let now = self.clock.now();
        let date = format_horoscope_date(now, self.date_zone);
        let timestamp = format_timestamp(now);
        info!("Starting horoscope run for {} ({:?})", date, self.failure_policy);

        let mut stored = Vec::with_capacity(ZodiacSign::ALL.len());
        let mut failures = Vec::new();

        for (idx, zodiac) in ZodiacSign::ALL.iter().copied().enumerate() {
            self.set_state(JobState::Running { zodiac });

            match self.process_sign(zodiac, &date, &timestamp).await {
                Ok(()) => {
                    info!("Successfully stored prediction for zodiac {} ({})", zodiac.id(), zodiac);
                    stored.push(zodiac);
                }
                Err(e) => {
                    error!("Error processing zodiac {} ({}): {}", zodiac.id(), zodiac, e);
                    if self.failure_policy == FailurePolicy::FailFast {
                        return Err(e);
                    }
                    failures.push(e);
                }
            }

            if idx + 1 < ZodiacSign::ALL.len() {
                self.rate_limit.wait().await;
            }
        }

        if !failures.is_empty() {
            error!(
                "Horoscope run for {} finished with {} failed sign(s)",
                date,
                failures.len()
            );
            return Err(JobError::Failures(failures));
        }

        info!("Horoscope run for {} completed: {} signs stored", date, stored.len());
        Ok(JobReport {
            date,
            timestamp,
            stored,
        })
    }

    async fn process_sign(&self, zodiac: ZodiacSign, date: &str, timestamp: &str) -> Result<(), JobError> {
        let summary = self
            .provider
            .fetch_summary(zodiac, date)
            .await
            .map_err(|source| JobError::Fetch { zodiac, source })?;
        let detail = self
            .provider
            .fetch_detail(zodiac, date)
            .await
            .map_err(|source| JobError::Fetch { zodiac, source })?;

        let record = assemble(zodiac, date, timestamp, &summary, &detail)
            .map_err(|source| JobError::Assembly { zodiac, source })?;

        self.store
            .put(&record)
            .await
            .map_err(|source| JobError::Persistence { zodiac, source })
    }

    fn set_state(&self, state: JobState) {
        *lock_state(&self.state) = state;
    }
}
