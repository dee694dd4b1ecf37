//! Core modules for seat allotment.
//!
//! Shared runtime (store, broker, config, logging, output) plus the
//! assignment manager that owns every seat/employee mutation.

pub mod assignment;
pub mod broker;
pub mod config;
pub mod db;
pub mod envelope;
pub mod error;
pub mod logging;
pub mod model;
pub mod output;
pub mod repo;
pub mod request;
pub mod schemas;
pub mod store;

