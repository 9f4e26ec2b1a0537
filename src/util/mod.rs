//! Building blocks for collecting and classifying pack content.

mod extendable_queue;
pub mod extension;
pub mod pack_format;
pub mod walk;

#[doc(inline)]
pub use extendable_queue::ExtendableQueue;
