pub mod board;
pub mod eval_constants;
pub mod game;
pub mod generator;
pub mod perft;
pub mod positions;
pub mod rules;
pub mod stability;

pub use perft::perft;
