//! Request interception pipeline for shellproxy.
//!
//! This crate provides the service-worker core: URL classification, the
//! tiered fetch router, the install/activate lifecycle, and the push
//! notification surface, behind the `ServiceWorker` facade.

pub mod classify;
pub mod fetch;
pub mod lifecycle;
pub mod push;
pub mod router;
pub mod worker;

#[cfg(test)]
pub(crate) mod testutil;

pub use classify::{Classifier, RoutingDecision};
pub use fetch::{FetchMode, HttpNetwork, Network, WorkerRequest, WorkerResponse, cache_key};
pub use lifecycle::{Lifecycle, WorkerState};
pub use push::{ClientCommand, Notification, NotificationAction, PushHandler};
pub use router::{FetchOutcome, FetchRouter};
pub use worker::ServiceWorker;
