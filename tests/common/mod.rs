//! Shared test utilities for bridge integration tests.

pub mod mock_transport;

pub use mock_transport::MockTransport;
