//! Dynamic Delivery Pricing & Multi-Courier Comparison Engine
//!
//! This crate turns a shipment description (weight, dimensions, distance,
//! origin and destination) into ranked, customer-facing delivery prices across
//! competing couriers, applying per-merchant markup policies along the way.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod engine;
pub mod error;
pub mod models;
