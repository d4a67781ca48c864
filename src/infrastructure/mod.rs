pub mod alpaca;
pub mod core;
pub mod csv_bars;
pub mod factory;
pub mod mock;

pub use csv_bars::CsvBarSource;
pub use factory::ServiceFactory;
pub use mock::MockBarSource;
