pub mod data;
pub mod io;

pub use data::{Config, OutputLimits};
pub use io::ConfigError;

#[cfg(test)]
mod tests;
