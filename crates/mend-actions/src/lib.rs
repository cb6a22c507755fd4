//! Code-action aggregation and execution.
//!
//! Mend collects candidate code actions (fixes, refactors, organize-import
//! operations) from an open set of registered [`ActionProvider`]s, filters
//! and selects among them, resolves lazily populated payloads, and finally
//! applies the chosen action's workspace edit and/or dispatches its command.
//!
//! The pipeline is a chain of independently testable stages:
//!
//! ```text
//! aggregate -> filter -> select -> resolve -> apply edit -> dispatch command
//! ```
//!
//! ## Cancellation
//!
//! One [`CancellationToken`] is threaded through a whole flow. Every provider
//! call runs with a child token; on timeout only that child is cancelled.
//! Providers **must** cooperate by periodically checking
//! `cancel.is_cancelled()` and returning promptly when cancelled.
//!
//! ## Provider failures
//!
//! A provider that errors, panics, or times out contributes zero actions and
//! never fails the surrounding flow. Failures are logged under the
//! `mend.actions` target.

mod action;
mod command;
mod document;
mod engine;
mod error;
mod filter;
mod handler;
mod host;
mod kind;
mod provider;
mod registry;
mod select;

pub use action::{code_action_for_edit, SourcedAction};
pub use command::{CommandError, CommandHandler, CommandRegistry};
pub use document::{Document, DocumentSelector};
pub use engine::{CodeActionEngine, EngineOptions};
pub use error::CodeActionError;
pub use filter::filter_actions;
pub use handler::{CodeActionHandler, RangeMode};
pub use host::{DocumentView, EditSink, HostError};
pub use kind::{covered_by_any, kind_covers};
pub use provider::{ActionProvider, ProviderError, ProviderErrorKind, ProviderResult};
pub use registry::{ProviderHandle, ProviderRegistry, RegisteredProvider};
pub use select::{select_action, ActionIdentifier, ActionPicker};

pub use tokio_util::sync::CancellationToken;
