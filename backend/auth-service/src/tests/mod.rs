/// Unit tests for auth-service core logic.
///
/// Everything here runs without a database; the full state machine is
/// exercised against the in-memory store in `tests/auth_flow.rs`.
pub mod fixtures;
pub mod unit_tests;
