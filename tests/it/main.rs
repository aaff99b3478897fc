//! Single test binary entry point.
//!
//! All tests compile into one binary to keep linking to a single pass.
//!
//! Structure:
//! - helpers: Temporary data files and registry builders
//! - integration: Multi-component workflow tests
//! - unit: Single-component unit tests
