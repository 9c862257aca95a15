#![forbid(unsafe_code)]

pub mod answer;
pub mod model;
pub mod time;

pub use answer::evaluate_selection;
pub use time::Clock;
