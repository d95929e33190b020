//! bunq tool registry and execution

mod banking;
mod definitions;
mod executor;
mod format;

pub use banking::{BankingTools, CounterpartyPayment, DEFAULT_PAYMENT_COUNT, MAX_PAYMENT_COUNT};
pub use definitions::ToolRegistry;
pub use executor::ToolExecutor;
pub use format::{format_recent_payments, RecentAmount, RecentCounterparty, RecentPayment};

#[cfg(test)]
pub(crate) use banking::mock;
