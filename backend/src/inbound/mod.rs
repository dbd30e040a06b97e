//! Inbound adapters translating external requests into domain port calls.
//!
//! The REST surface lives under [`http`]; framework details stay at this edge.

pub mod http;
