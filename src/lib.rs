//! Salary data for Major League Soccer players, 2007-2022: loading,
//! aggregation and selection behind the dashboard.

pub mod config;
pub mod data;
pub mod error;
