//! Contractor Estimator - conversational intake and adaptive pricing
//!
//! This crate gathers construction project details through a slot-filling
//! chat and learns from completed estimates to recommend materials, cost
//! ranges and markups for new projects.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
