mod config;
mod engine;
mod hint;
mod observer;
mod phase;
mod player;
mod profile;
mod rng;
mod timer;
mod words;

pub use crate::config::*;
pub use crate::engine::*;
pub use crate::hint::*;
pub use crate::observer::*;
pub use crate::phase::*;
pub use crate::player::*;
pub use crate::profile::*;
pub use crate::rng::*;
pub use crate::timer::*;
pub use crate::words::*;
