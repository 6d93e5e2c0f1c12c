//! # appdesk-contracts
//!
//! Shared record types, document shapes, and error contracts for appdesk.
//!
//! Every other crate in the workspace imports from here. No I/O lives in
//! this crate, only data definitions and error types.

pub mod admin;
pub mod application;
pub mod audit;
pub mod document;
pub mod error;
