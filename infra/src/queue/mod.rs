//! Queue module for the Redis-backed transport
//!
//! Each logical queue is a Redis list. Receiving atomically moves a message
//! into a companion processing list, where it stays until completed or
//! abandoned.

pub mod redis_client;
pub mod redis_queue;

#[cfg(test)]
mod tests;

pub use redis_client::RedisClient;
pub use redis_queue::RedisQueue;
