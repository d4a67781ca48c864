// Market data processing modules
pub mod indicators;
pub mod sliding_window;
