//! Domain layer for experiences

pub mod entities;
pub mod state;
pub mod tags;
