// Market data domain
pub mod market;

// Features, evaluation records
pub mod ml;

// Port interfaces
pub mod ports;

// Domain-specific error types
pub mod errors;
