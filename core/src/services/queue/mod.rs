//! Queue abstractions
//!
//! The verification service consumes one queue and publishes to another. Both
//! sides go through these traits so the transport can be swapped.

mod memory;
mod traits;

#[cfg(test)]
mod tests;

pub use memory::InMemoryQueue;
pub use traits::{QueueMessage, QueuePublisher, QueueReceiver};
