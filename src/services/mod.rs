//! External collaborators: the upstream tick feed and the outbound
//! subscriber fan-out.

pub mod broadcast;
pub mod market_data;

pub use broadcast::{SignalBroadcaster, StreamMessage};
pub use market_data::{MarketDataProvider, SimulatedMarketDataProvider};
