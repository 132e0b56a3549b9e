//! Badge refresh orchestration.
//!
//! [`BadgeAggregator::refresh_badges`] returns immediately with a
//! [`BadgeRefresh`] handle; the count queries run as independent tasks and
//! write into the shared [`BadgeBoard`]. A failing query only affects its own
//! badge. Cancelling (or dropping) the handle stops outstanding queries, and
//! results that arrive after cancellation or after a newer refresh are
//! discarded.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use cockpit_registry::{ActionDescriptor, Context, Invocation, bind};
use tokio::runtime::Handle;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::board::BadgeBoard;
use crate::config::AggregatorConfig;
use crate::failure::{BadgeQueryFailure, FailureKind, FailureSink};
use crate::runtime;
use crate::transport::CountTransport;


/// Refreshes badge counts through a [`CountTransport`].
#[derive(Clone)]
pub struct BadgeAggregator {
	transport: Arc<dyn CountTransport>,
	board: BadgeBoard,
	sink: Option<Arc<dyn FailureSink>>,
	config: AggregatorConfig,
	runtime: Option<Handle>,
	generations: Arc<AtomicU64>,
}

impl std::fmt::Debug for BadgeAggregator {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("BadgeAggregator")
			.field("board", &self.board)
			.field("config", &self.config)
			.field("generation", &self.generations.load(Ordering::Acquire))
			.finish_non_exhaustive()
	}
}

impl BadgeAggregator {
	pub fn new(transport: Arc<dyn CountTransport>, board: BadgeBoard) -> Self {
		Self {
			transport,
			board,
			sink: None,
			config: AggregatorConfig::default(),
			runtime: None,
			generations: Arc::default(),
		}
	}

	pub fn with_sink(mut self, sink: Arc<dyn FailureSink>) -> Self {
		self.sink = Some(sink);
		self
	}

	pub fn with_config(mut self, config: AggregatorConfig) -> Self {
		self.config = config;
		self
	}

	/// Spawns queries on `handle` instead of the caller's runtime.
	pub fn with_runtime(mut self, handle: Handle) -> Self {
		self.runtime = Some(handle);
		self
	}

	pub fn board(&self) -> &BadgeBoard {
		&self.board
	}

	/// Starts a count query for every badge-carrying action.
	///
	/// Parameters are bound against `ctx`; an action whose parameters cannot
	/// be fully bound is reported as failed without issuing a query. Must be
	/// cheap to call from synchronous code: nothing here awaits.
	pub fn refresh_badges<'a>(&self, actions: impl IntoIterator<Item = &'a ActionDescriptor>, ctx: &Context) -> BadgeRefresh {
		let generation = self.generations.fetch_add(1, Ordering::AcqRel) + 1;
		let cancel = CancellationToken::new();
		let mut refresh = BadgeRefresh {
			generation,
			cancel: cancel.clone(),
			tasks: JoinSet::new(),
			summary: RefreshSummary {
				generation,
				..RefreshSummary::default()
			},
			armed: true,
		};

		let handle = runtime::query_handle(self.runtime.as_ref());

		for action in actions {
			let Some(badge) = action.badge() else {
				continue;
			};
			self.board.seed(&action.api, badge.default_count);

			let invocation = match bind(action, ctx).into_invocation(&action.api) {
				Ok(invocation) => invocation,
				Err(unresolved) => {
					report(
						self.sink.as_deref(),
						&BadgeQueryFailure {
							api: action.api.clone(),
							generation,
							kind: FailureKind::Unresolved(unresolved),
						},
					);
					refresh.summary.failed += 1;
					continue;
				}
			};
			let handle = match &handle {
				Ok(handle) => handle,
				Err(reason) => {
					report(
						self.sink.as_deref(),
						&BadgeQueryFailure {
							api: action.api.clone(),
							generation,
							kind: FailureKind::Runtime(reason.clone()),
						},
					);
					refresh.summary.failed += 1;
					continue;
				}
			};

			let query = BadgeQuery {
				transport: Arc::clone(&self.transport),
				board: self.board.clone(),
				sink: self.sink.clone(),
				cancel: cancel.child_token(),
				timeout: self.config.query_timeout(),
				generation,
				invocation,
			};
			tracing::trace!(badge = %action.api, generation, "badge query spawned");
			refresh.tasks.spawn_on(query.run(), handle);
		}

		tracing::debug!(generation, queries = refresh.tasks.len(), "badge refresh started");
		refresh
	}
}

/// Per-refresh tally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RefreshSummary {
	pub generation: u64,
	pub refreshed: usize,
	pub failed: usize,
	pub cancelled: usize,
	/// Counts discarded because a newer refresh already landed.
	pub superseded: usize,
}

impl RefreshSummary {
	fn record(&mut self, outcome: QueryOutcome) {
		match outcome {
			QueryOutcome::Refreshed => self.refreshed += 1,
			QueryOutcome::Failed => self.failed += 1,
			QueryOutcome::Cancelled => self.cancelled += 1,
			QueryOutcome::Superseded => self.superseded += 1,
		}
	}
}

/// Handle to an in-flight refresh.
///
/// Dropping the handle cancels outstanding queries, which is what a view
/// should do when it is torn down. Use [`BadgeRefresh::detach`] to let the
/// queries finish without holding the handle.
#[derive(Debug)]
pub struct BadgeRefresh {
	generation: u64,
	cancel: CancellationToken,
	tasks: JoinSet<QueryOutcome>,
	summary: RefreshSummary,
	armed: bool,
}

impl BadgeRefresh {
	pub fn generation(&self) -> u64 {
		self.generation
	}

	/// Requests cancellation of every outstanding query.
	pub fn cancel(&self) {
		tracing::debug!(generation = self.generation, "badge refresh cancelled");
		self.cancel.cancel();
	}

	pub fn is_cancelled(&self) -> bool {
		self.cancel.is_cancelled()
	}

	/// Waits for every query and returns the tally.
	pub async fn wait(mut self) -> RefreshSummary {
		let mut tasks = std::mem::take(&mut self.tasks);
		let mut summary = self.summary;
		while let Some(joined) = tasks.join_next().await {
			match joined {
				Ok(outcome) => summary.record(outcome),
				Err(error) => {
					tracing::warn!(generation = self.generation, %error, "badge query task ended abnormally");
					summary.failed += 1;
				}
			}
		}
		self.armed = false;
		summary
	}

	/// Lets the queries run to completion unobserved.
	pub fn detach(mut self) {
		self.tasks.detach_all();
		self.armed = false;
	}
}

impl Drop for BadgeRefresh {
	fn drop(&mut self) {
		if self.armed {
			self.cancel.cancel();
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum QueryOutcome {
	Refreshed,
	Failed,
	Cancelled,
	Superseded,
}

struct BadgeQuery {
	transport: Arc<dyn CountTransport>,
	board: BadgeBoard,
	sink: Option<Arc<dyn FailureSink>>,
	cancel: CancellationToken,
	timeout: Duration,
	generation: u64,
	invocation: Invocation,
}

impl BadgeQuery {
	async fn run(self) -> QueryOutcome {
		let result = tokio::select! {
			biased;
			() = self.cancel.cancelled() => return QueryOutcome::Cancelled,
			result = tokio::time::timeout(self.timeout, self.transport.count(&self.invocation)) => result,
		};

		let api = &self.invocation.api;
		let kind = match result {
			Ok(Ok(count)) => {
				if self.cancel.is_cancelled() {
					return QueryOutcome::Cancelled;
				}
				if !self.board.apply(api, self.generation, count) {
					tracing::debug!(badge = %api, generation = self.generation, "badge count superseded");
					return QueryOutcome::Superseded;
				}
				tracing::debug!(badge = %api, generation = self.generation, count, "badge refreshed");
				return QueryOutcome::Refreshed;
			}
			Ok(Err(error)) => FailureKind::Transport(error),
			Err(_) => FailureKind::Timeout(self.timeout),
		};

		if self.cancel.is_cancelled() {
			return QueryOutcome::Cancelled;
		}
		report(
			self.sink.as_deref(),
			&BadgeQueryFailure {
				api: api.clone(),
				generation: self.generation,
				kind,
			},
		);
		QueryOutcome::Failed
	}
}

fn report(sink: Option<&dyn FailureSink>, failure: &BadgeQueryFailure) {
	tracing::warn!(badge = %failure.api, generation = failure.generation, error = %failure.kind, "badge query failed");
	if let Some(sink) = sink {
		sink.report(failure);
	}
}
