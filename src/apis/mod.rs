pub mod geocode;
pub mod sheets;
pub mod social;
