//! Port definitions for application layer
//!
//! Ports are interfaces that define how the application interacts with
//! external systems. Adapters in the infrastructure layer implement these ports.

mod clock_port;
mod publisher_port;

pub use clock_port::ClockPort;
#[cfg(test)]
pub use clock_port::MockClockPort;
#[cfg(test)]
pub use publisher_port::MockPublisherPort;
pub use publisher_port::PublisherPort;
