//! HTTP API integration tests over the in-memory store

pub mod rooms_test;
