//! Application layer: the handler factory, the notification bus, and the
//! `OrderProcessor` that coordinates validation, pricing, payment and
//! status transitions over the domain ports.

pub mod bus;
pub mod factory;
pub mod processor;
