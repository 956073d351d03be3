pub mod chart;
pub mod price;
pub mod record;

pub use chart::*;
pub use price::*;
pub use record::*;
