pub mod output;

pub use output::{format_duration, format_number};
