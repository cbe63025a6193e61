//! Concrete implementations of the domain ports: simulated payment
//! gateways, fee adjustments, and example observers.

pub mod adjustments;
pub mod gateways;
pub mod observers;
