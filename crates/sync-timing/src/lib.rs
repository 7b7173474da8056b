pub mod debounce;
pub mod repeating;

pub use debounce::Debouncer;
pub use repeating::{RepeatingTimer, Tick};
