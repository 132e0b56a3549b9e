//! Badge counters for console actions.
//!
//! An action descriptor may declare a badge: a small count shown next to the
//! action, such as the number of pending project invitations. The
//! [`BadgeAggregator`] binds each badge action's parameters, issues a count
//! query through a [`CountTransport`], and records the result in a shared
//! [`BadgeBoard`]. Queries are independent; one failing or timing out never
//! affects another badge, and an in-flight refresh can be cancelled.

mod aggregator;
pub mod board;
mod config;
mod failure;
mod runtime;
mod transport;

pub use aggregator::{BadgeAggregator, BadgeRefresh, RefreshSummary};
pub use board::{BadgeBoard, BadgeState};
pub use config::AggregatorConfig;
pub use failure::{BadgeQueryFailure, FailureKind, FailureSink};
pub use transport::{CountTransport, TransportError};
