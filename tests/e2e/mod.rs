//! End-to-end client journeys
//!
//! Each scenario drives the full router in the order a chat client would.

pub mod app_suite;
