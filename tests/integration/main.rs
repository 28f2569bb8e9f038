//! Integration tests

mod common;
mod e2e_test;
mod properties_test;
mod scenario_test;
