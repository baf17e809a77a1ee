//! Second-hand market module.

mod repository;
mod types;

pub use repository::MarketRepository;
pub use types::{ItemStatus, MarketItem, NewMarketItem};
