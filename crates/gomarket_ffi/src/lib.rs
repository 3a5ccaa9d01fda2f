//! Flutter bridge for the GoMarketplace cart core.

pub mod api;
