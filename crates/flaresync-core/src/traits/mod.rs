//! Core traits for flaresync
//!
//! The two seams between the reconciliation core and the outside world.
//!
//! - [`IpEndpoint`]: One external public-IP lookup service
//! - [`DnsProvider`]: Zone/record listing and record updates at the provider

pub mod dns_provider;
pub mod ip_endpoint;

pub use dns_provider::DnsProvider;
pub use ip_endpoint::{IpEndpoint, ResponseFormat};
