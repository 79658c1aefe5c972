//! Shared test doubles for the migrator workspace.
//!
//! - [`FakeRoleService`]: records every create-role / assign-role call and
//!   fails the ones it is told to.
//! - [`InMemorySource`]: a source client backed by plain vectors, with
//!   per-route failures.
//! - Cloud Controller page builders and wiremock mounting helpers for tests
//!   that go through real HTTP.

mod fake_role_service;
mod fake_source;
mod fixtures;

pub use fake_role_service::*;
pub use fake_source::*;
pub use fixtures::*;
