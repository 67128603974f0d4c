//! Application layer orchestrating the gateway's request paths.
//!
//! Every request starts with [`access::ConsentAccessValidator`]. Read paths
//! then go through [`accounts::AccountReadService`], which redacts records to
//! the consent's permissions. Write paths go through
//! [`payments::PaymentService`], which stores at most one payment per consent
//! via [`submission::IdempotentPaymentSubmitter`].

pub mod access;
pub mod accounts;
pub mod payments;
pub mod submission;
