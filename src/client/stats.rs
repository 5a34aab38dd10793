//! Read-only request diagnostics.

// self
use crate::_prelude::*;

/// Snapshot of completed requests for one client (and its clones).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ClientStats {
	/// Requests that reached the transport and completed, successfully or not.
	pub request_count: u64,
	/// Completion instant of the most recent request.
	pub last_request_at: Option<OffsetDateTime>,
}
impl ClientStats {
	pub(crate) fn record(&mut self, completed_at: OffsetDateTime) {
		self.request_count = self.request_count.saturating_add(1);
		self.last_request_at = Some(completed_at);
	}
}
