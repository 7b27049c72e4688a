pub mod apply_cancellation;
pub mod apply_enhanced_errors;
/// Component tests for pgmt
/// Tests individual components and services that may use external resources
/// These tests focus on single component behavior rather than full integration workflows
pub mod docker;
pub mod enhanced_error_reporting;
