//! Domain model: consents, permissions, payments, account records and the
//! pure rules (redaction, frequency) that operate on them.

pub mod account;
pub mod consent;
pub mod frequency;
pub mod payment;
pub mod permission;
pub mod ports;
pub mod redaction;
pub mod resources;
