//! Extension points implemented by other crates.

pub mod transport;

pub use transport::Transport;
