#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Request-scoped security context.
//!
//! The lifecycle layer never reads "the current user" from ambient state. Every
//! mutation receives a [`SecurityContext`] from the caller, and the audit hooks
//! ask it for the acting subject through [`ActorResolver`].

pub mod actor;
pub mod constants;
pub mod context;
pub mod subject;

pub use actor::{ActorResolver, NoActor};
pub use context::{SecurityContext, SecurityContextBuilder};
pub use subject::{Subject, SubjectKind};
