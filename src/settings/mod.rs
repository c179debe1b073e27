//! The settings page and per-user preferences.

mod currency_endpoint;
mod page;
mod preferences;

pub use currency_endpoint::set_currency_endpoint;
pub use page::get_settings_page;
pub use preferences::{create_preference_table, get_currency, set_currency};
