#![no_std]

mod error;
mod state;

pub mod bus;
pub mod config;
pub mod engine;
pub mod frame;
pub mod interface;
pub mod transport;
pub mod wait;

pub use crate::engine::TransferEngine;
pub use crate::error::{Error, Result};
pub use crate::state::Mode;
pub use crate::transport::Transport;
