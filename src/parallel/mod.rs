//! Concurrent front end for Crisp
//!
//! A bounded [`Channel`] is the only state shared between the lexer and
//! parser tasks of the [`Pipeline`]; its capacity is the backpressure point.

mod channel;
mod pipeline;

pub use channel::Channel;
pub use pipeline::Pipeline;
