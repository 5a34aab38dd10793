//! Departure gate that spaces outgoing requests by a minimum interval.
//!
//! Callers queue on a fair async mutex, so departures happen in arrival order. The holder
//! sleeps until the floor has elapsed since the previous departure, stamps its own departure,
//! and releases the gate; nobody is ever rejected.
//!
//! [`PacingGate::shared`] hands out one gate per interval for the whole process, which is what
//! the client's default constructors use.

// std
use std::sync::Weak;
// self
use crate::_prelude::*;

static SHARED_GATES: Mutex<Vec<(StdDuration, Weak<PacingGate>)>> =
	parking_lot::const_mutex(Vec::new());

/// Outcome of evaluating the gate at a given instant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PacingDecision {
	/// The request may depart immediately.
	Proceed,
	/// The request must wait for the remaining interval.
	Delay(StdDuration),
}

/// Process-local pacing gate shared by every clone of a client.
#[derive(Debug)]
pub struct PacingGate {
	min_interval: StdDuration,
	last_departure: AsyncMutex<Option<Instant>>,
}
impl PacingGate {
	/// Creates a gate enforcing `min_interval` between departures.
	pub fn new(min_interval: StdDuration) -> Self {
		Self { min_interval, last_departure: AsyncMutex::new(None) }
	}

	/// Returns the process-wide gate for `min_interval`, creating it on first use.
	///
	/// The gate lives as long as some client holds it; a later call after every holder is
	/// gone starts from a fresh departure history.
	pub fn shared(min_interval: StdDuration) -> Arc<Self> {
		let mut gates = SHARED_GATES.lock();

		gates.retain(|(_, gate)| gate.strong_count() > 0);

		if let Some(gate) = gates
			.iter()
			.find(|(interval, _)| *interval == min_interval)
			.and_then(|(_, gate)| gate.upgrade())
		{
			return gate;
		}

		let gate = Arc::new(Self::new(min_interval));

		gates.push((min_interval, Arc::downgrade(&gate)));

		gate
	}

	/// Configured spacing.
	pub fn min_interval(&self) -> StdDuration {
		self.min_interval
	}

	/// Decides whether a departure at `now` respects the floor after `previous`.
	pub fn decision_at(&self, previous: Option<Instant>, now: Instant) -> PacingDecision {
		let Some(previous) = previous else {
			return PacingDecision::Proceed;
		};
		let ready_at = previous + self.min_interval;

		if ready_at > now { PacingDecision::Delay(ready_at - now) } else { PacingDecision::Proceed }
	}

	/// Waits for the caller's turn and returns the recorded departure instant.
	pub async fn wait(&self) -> Instant {
		let mut last = self.last_departure.lock().await;

		if let PacingDecision::Delay(remaining) = self.decision_at(*last, Instant::now()) {
			tokio::time::sleep(remaining).await;
		}

		let departed = Instant::now();

		*last = Some(departed);

		departed
	}

	/// Instant of the most recent departure, if any.
	pub async fn last_departure(&self) -> Option<Instant> {
		*self.last_departure.lock().await
	}
}
