pub mod portfolio_store;
