//! Taskform Engine
//!
//! Turns a form definition and a task's variables into a renderable form,
//! and turns what the user entered back into typed variables.
//!
//! The pieces, in the order a task form passes through them:
//!
//! - [`classify`] groups variables into buckets by name prefix
//! - [`interpret`] walks a component tree or the buckets and produces a
//!   [`RenderedForm`], using [`Interpolator`] for `${...}` templates and
//!   [`layout`] for grid spans
//! - [`submit`] / [`reconcile`] merge a [`SubmissionDraft`] with the original
//!   variables and coerce every value to its declared type
//!
//! All of it is synchronous and free of I/O.

mod classify;
mod config;
mod error;
mod host;
mod interpolate;
mod interpret;
mod layout;
mod reconcile;
mod render;

pub use classify::{BucketSet, DEFAULT_BUCKET, bucket_of, classify};
pub use config::{DEFAULT_TOTAL_COLUMNS, EngineConfig};
pub use error::EngineError;
pub use host::HostContext;
pub use interpolate::{Interpolator, interpolate};
pub use interpret::{Definition, FormSource, interpret};
pub use layout::{DEFAULT_ROW, Laid, LayoutRow, LayoutRows, layout};
pub use reconcile::{
  CoercionWarning, NumericFallback, ReconcileOptions, Submission, SubmissionDraft, WarningKind,
  reconcile, submit,
};
pub use render::{
  ButtonBehavior, ButtonControl, ChoiceControl, ChoiceOption, Control, FileControl, FormMode,
  GroupControl, NumberControl, RenderedField, RenderedForm, RenderedRow, TextControl,
  WidgetControl,
};
