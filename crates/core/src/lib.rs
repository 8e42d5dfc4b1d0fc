//! Domain logic for the business dashboard.
//!
//! This crate has no I/O: layouts, grid placement, derived statistics,
//! Gantt bar positioning and calendar generation are all pure functions
//! over data handed in by the caller.

pub mod calendar;
pub mod currency;
pub mod error;
pub mod gantt;
pub mod grid;
pub mod layout;
pub mod stats;
pub mod types;
pub mod widget;
