//! # Integration tests
//!
//! Integration tests completely external from the crate. All code written in this module could be
//! written by an external user of the crate: a search that drives the handler, and the problems it
//! is driven on.
mod problems;
mod properties;
mod scenarios;
mod search;
