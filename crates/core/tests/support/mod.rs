//! Shared test helpers for `goca-core` integration tests.
//!
//! In-memory ports and a scripted calendar client so the orchestration tests
//! can focus on behaviour instead of boilerplate.

#![allow(dead_code)]

pub mod booking;
