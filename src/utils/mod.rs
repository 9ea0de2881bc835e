//! Shared helpers: id generation, timestamps and text utilities

mod common;
mod id_gen;

pub use common::*;
pub use id_gen::{IdGenerator, generate_user_id};
