//! Integration test modules

mod cli;
