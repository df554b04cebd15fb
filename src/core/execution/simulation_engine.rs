use crate::core::collections::{ContainerError, HashTable, Queue};
use crate::core::event_scheduler::CleaningScheduler;
use crate::core::execution::config::EngineConfig;
use crate::core::types::{CleaningState, Fingerprint, Outcome, Request, Sword, Workload};
use log::{debug, info, trace, warn};
use std::mem;
use std::rc::Rc;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("No sword in inventory matches request class {0}")]
    UnknownSwordClass(Fingerprint),
    #[error("Request arriving at {arrival} was queued after one arriving at {previous}")]
    OutOfOrderRequest { arrival: u64, previous: u64 },
    #[error("Cleaning for {duration} starting at {start} runs past the end of simulated time")]
    TimeOverflow { start: u64, duration: u64 },
    #[error("{waiting} requests are waiting at time {time} but no cleaning is in flight")]
    Stalled { time: u64, waiting: usize },
    #[error(transparent)]
    Container(#[from] ContainerError),
}

/// A matched request, tagged with the order it arrived in
#[derive(Debug, Clone)]
struct Waiting {
    ticket: u64,
    request: Request,
}

/// Inventory entry for one sword class: the sword handed out, its cleaning
/// schedule, and the requests waiting for that cleaning in arrival order
struct Stocked {
    sword: Rc<Sword>,
    state: CleaningState,
    waiting: Queue<Waiting>,
}

/// Schedule the outstanding cleaning of a dirty sword, finishing at its
/// dirty level
fn seed(
    scheduler: &mut CleaningScheduler,
    fingerprint: Fingerprint,
    dirty_level: Option<u64>,
) -> CleaningState {
    let mut state = CleaningState::default();
    if let Some(level) = dirty_level {
        let sequence_num = scheduler.schedule(fingerprint, level);
        state.schedule(level, level, sequence_num);
    }
    state
}

/// Discrete-event engine for the sword-cleaning service.
///
/// Time jumps straight from one event to the next, where an event is either a
/// request arrival or a cleaning completion. At every event time the engine
/// matches the arrivals, drains the cleanings that are done, and resolves the
/// requests waiting on exactly those cleanings. Each class keeps its own
/// waiting queue, so a completion only touches the requests it serves.
pub struct SimulationEngine {
    config: EngineConfig,
    inventory: HashTable<Fingerprint, Stocked>,
    scheduler: CleaningScheduler,
    arrivals: Queue<Request>,
    ready: Queue<Fingerprint>,
    outcomes: Vec<Outcome>,
    current_time: u64,
    last_arrival: Option<u64>,
    next_ticket: u64,
    waiting: usize,
}

impl SimulationEngine {
    /// Create an engine with empty inventory and no requests
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        Ok(Self {
            inventory: HashTable::with_capacity(config.table_capacity)?,
            scheduler: CleaningScheduler::new(),
            arrivals: Queue::with_capacity(config.queue_capacity)?,
            ready: Queue::with_capacity(config.queue_capacity)?,
            outcomes: Vec::new(),
            current_time: 0,
            last_arrival: None,
            next_ticket: 0,
            waiting: 0,
            config,
        })
    }

    /// Create an engine stocked with the workload's swords and requests
    pub fn from_workload(workload: Workload, config: EngineConfig) -> Result<Self, EngineError> {
        let mut engine = Self::new(config)?;
        for sword in workload.swords {
            engine.stock(sword)?;
        }
        for request in workload.requests {
            engine.enqueue_request(request)?;
        }
        Ok(engine)
    }

    /// Add a sword to the inventory.
    ///
    /// A sword that is still dirty has its outstanding cleaning scheduled
    /// immediately, finishing at its dirty level. Restocking a class replaces
    /// the sword handed out from then on; a cleaning already in flight for
    /// the class is kept, together with the requests waiting on it.
    pub fn stock(&mut self, mut sword: Sword) -> Result<(), EngineError> {
        let fingerprint = sword.fingerprint();
        let dirty_level = mem::take(&mut sword.state).dirty_level;
        let sword = Rc::new(sword);

        match self.inventory.get_mut(&fingerprint) {
            Some(stocked) => {
                warn!(
                    "Sword class {} stocked twice; '{}' was replaced by '{}'",
                    fingerprint, stocked.sword.name, sword.name
                );
                stocked.sword = sword;
                if !stocked.state.is_scheduled() {
                    stocked.state = seed(&mut self.scheduler, fingerprint, dirty_level);
                } else if dirty_level.is_some() {
                    debug!(
                        "Class {} keeps its cleaning in flight until {:?}",
                        fingerprint, stocked.state.completion_time
                    );
                }
            }
            None => {
                let stocked = Stocked {
                    state: seed(&mut self.scheduler, fingerprint, dirty_level),
                    waiting: Queue::with_capacity(self.config.queue_capacity)?,
                    sword,
                };
                self.inventory.insert(fingerprint, stocked);
            }
        }
        Ok(())
    }

    /// Queue a request. Requests must arrive in non-decreasing time order.
    pub fn enqueue_request(&mut self, request: Request) -> Result<(), EngineError> {
        if let Some(previous) = self.last_arrival {
            if request.arrival_time < previous {
                return Err(EngineError::OutOfOrderRequest {
                    arrival: request.arrival_time,
                    previous,
                });
            }
        }
        self.last_arrival = Some(request.arrival_time);
        self.arrivals.push(request)?;
        Ok(())
    }

    /// Run until every request is resolved, returns the outcomes in the order
    /// the requests finished
    pub fn run(&mut self) -> Result<&[Outcome], EngineError> {
        info!(
            "Starting simulation: {} swords stocked, {} requests queued, {} cleanings in flight",
            self.inventory.len(),
            self.arrivals.len(),
            self.scheduler.len()
        );

        while self.step()? {}

        info!(
            "Simulation stopped at time {} with {} outcomes",
            self.current_time,
            self.outcomes.len()
        );
        Ok(&self.outcomes)
    }

    /// Jump to the next event time and process it, returns true if work remains
    pub fn step(&mut self) -> Result<bool, EngineError> {
        if self.is_finished() {
            return Ok(false);
        }

        let Some(next_time) = self.next_event_time() else {
            return Err(EngineError::Stalled {
                time: self.current_time,
                waiting: self.waiting,
            });
        };

        if let Some(limit) = self.config.time_limit {
            if next_time > limit {
                warn!(
                    "Time limit {} reached with {} requests unresolved",
                    limit,
                    self.arrivals.len() + self.waiting
                );
                return Ok(false);
            }
        }

        self.current_time = next_time.max(self.current_time);
        debug!("=== Simulation Time {} ===", self.current_time);

        let matched = self.match_arrivals()?;
        let completed = self.drain_completions()?;
        let resolved = self.resolve_waiting()?;

        debug!(
            "matched {} arrivals, completed {} cleanings, resolved {} requests ({} still waiting)",
            matched,
            completed,
            resolved,
            self.waiting
        );

        Ok(!self.is_finished())
    }

    /// Earliest pending arrival or cleaning completion
    pub fn next_event_time(&self) -> Option<u64> {
        let next_arrival = self.arrivals.peek_front().map(|request| request.arrival_time);
        let next_completion = self.scheduler.peek_next_completion();
        match (next_arrival, next_completion) {
            (Some(arrival), Some(completion)) => Some(arrival.min(completion)),
            (arrival, completion) => arrival.or(completion),
        }
    }

    /// True once no request is left to arrive or waiting on a cleaning
    pub fn is_finished(&self) -> bool {
        self.arrivals.is_empty() && self.waiting == 0
    }

    /// Get current simulation time
    pub fn current_time(&self) -> u64 {
        self.current_time
    }

    pub fn outcomes(&self) -> &[Outcome] {
        &self.outcomes
    }

    pub fn into_outcomes(self) -> Vec<Outcome> {
        self.outcomes
    }

    /// The sword currently stocked for a class
    pub fn sword(&self, fingerprint: &Fingerprint) -> Option<&Sword> {
        self.inventory
            .get(fingerprint)
            .map(|stocked| stocked.sword.as_ref())
    }

    pub fn pending_requests(&self) -> usize {
        self.arrivals.len()
    }

    pub fn waiting_requests(&self) -> usize {
        self.waiting
    }

    pub fn cleanings_in_flight(&self) -> usize {
        self.scheduler.len()
    }

    /// Number of queued cleanings for one sword class
    pub fn cleanings_for(&self, fingerprint: Fingerprint) -> usize {
        self.scheduler.jobs_for(fingerprint)
    }

    /// Pop every request that has arrived by now. A sword that is not being
    /// cleaned gets a fresh cleaning; otherwise the request joins the one in
    /// flight. Either way the request waits on its class for that cleaning.
    fn match_arrivals(&mut self) -> Result<usize, EngineError> {
        let now = self.current_time;
        let mut matched = 0;

        while self
            .arrivals
            .peek_front()
            .is_some_and(|request| request.arrival_time <= now)
        {
            let Some(request) = self.arrivals.pop_front() else {
                break;
            };
            let fingerprint = request.fingerprint();
            let stocked = self
                .inventory
                .get_mut(&fingerprint)
                .ok_or(EngineError::UnknownSwordClass(fingerprint))?;

            if stocked.state.is_scheduled() {
                trace!(
                    "Request at {} joins in-flight cleaning of '{}'",
                    request.arrival_time,
                    stocked.sword.name
                );
            } else {
                let duration = stocked.sword.cleaning_duration;
                let completion_time = now.checked_add(duration).ok_or(EngineError::TimeOverflow {
                    start: now,
                    duration,
                })?;
                let sequence_num = self.scheduler.schedule(fingerprint, completion_time);
                stocked.state.schedule(duration, completion_time, sequence_num);
                trace!(
                    "Cleaning '{}' from {} until {} (job {})",
                    stocked.sword.name,
                    now,
                    completion_time,
                    sequence_num
                );
            }

            stocked.waiting.push(Waiting {
                ticket: self.next_ticket,
                request,
            })?;
            self.next_ticket += 1;
            self.waiting += 1;
            matched += 1;
        }

        Ok(matched)
    }

    /// Move every cleaning finished by now onto the ready queue
    fn drain_completions(&mut self) -> Result<usize, EngineError> {
        let mut completed = 0;
        while let Some(job) = self.scheduler.pop_due(self.current_time) {
            self.ready.push(job.sword)?;
            completed += 1;
        }
        Ok(completed)
    }

    /// Resolve every request waiting on a class whose cleaning just finished,
    /// then mark that class available again. Classes finishing at the same
    /// time are merged back into arrival order.
    fn resolve_waiting(&mut self) -> Result<usize, EngineError> {
        let now = self.current_time;
        let mut batch: Vec<(u64, Outcome)> = Vec::new();

        while let Some(fingerprint) = self.ready.pop_front() {
            let stocked = self
                .inventory
                .get_mut(&fingerprint)
                .ok_or(EngineError::UnknownSwordClass(fingerprint))?;

            while let Some(Waiting { ticket, request }) = stocked.waiting.pop_front() {
                let outcome = Outcome {
                    completion_time: now,
                    latency: now - request.arrival_time,
                    sword: Rc::clone(&stocked.sword),
                };
                trace!(
                    "Resolved request from {} with '{}' at {} (latency {})",
                    request.arrival_time,
                    stocked.sword.name,
                    now,
                    outcome.latency
                );
                batch.push((ticket, outcome));
            }
            stocked.state.reset();
        }

        batch.sort_unstable_by_key(|(ticket, _)| *ticket);
        let resolved = batch.len();
        self.waiting -= resolved;
        self.outcomes.extend(batch.into_iter().map(|(_, outcome)| outcome));
        Ok(resolved)
    }
}
