//! CLI command implementations.

pub mod account;
pub mod cart;
pub mod orders;
pub mod products;

use bobr_client::session::SessionState;
use bobr_client::shop::Shop;

/// Restore the persisted session, failing the command if there is none.
pub async fn require_session(shop: &mut Shop) -> Result<(), Box<dyn std::error::Error>> {
    match shop.restore().await? {
        SessionState::Authenticated => Ok(()),
        SessionState::Anonymous => Err("not logged in - run `bobr login` first".into()),
    }
}
