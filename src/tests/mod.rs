//! Behaviour tests spanning cache, controller, extension and node glue.
//!
//! Loads are driven through [`support::MockLoader`], which records every
//! request and only completes one when the test says so, in whatever order
//! the test picks.

pub(crate) mod support;
