//! Terminal output for the routeplan client
//!
//! - Status messages
//! - Progress spinners for service calls
//! - Delivery and route tables

#![warn(missing_docs)]

pub mod output;
pub mod progress;
pub mod table;
