//! Session and account commands.

use bobr_client::api::types::{ProfileUpdate, Registration, User};
use bobr_client::shop::Shop;
use bobr_core::Email;

use super::require_session;

type CommandResult = Result<(), Box<dyn std::error::Error>>;

fn print_user(user: &User) {
    println!("#{} {} <{}>", user.id, user.username, user.email);
    println!("  name: {} {}", user.first_name, user.last_name);
    if let Some(created_at) = &user.created_at {
        println!("  registered: {created_at}");
    }
}

/// Log in and persist the session token.
pub async fn login(shop: &mut Shop, login: &str, password: &str) -> CommandResult {
    let user = shop.login(login, password).await?;
    println!("Logged in as {} <{}>", user.username, user.email);
    Ok(())
}

/// Register a new account; the backend logs it in immediately.
pub async fn register(
    shop: &mut Shop,
    username: String,
    email: &str,
    password: String,
    first_name: String,
    last_name: String,
) -> CommandResult {
    let registration = Registration {
        username,
        email: Email::parse(email)?,
        password,
        first_name,
        last_name,
    };
    let user = shop.register(&registration).await?;
    println!("Registered and logged in as {} <{}>", user.username, user.email);
    Ok(())
}

/// End the session. Also clears the device-local cart.
pub fn logout(shop: &mut Shop) -> CommandResult {
    shop.logout()?;
    println!("Logged out; local cart cleared");
    Ok(())
}

/// Show the logged-in user's profile.
pub async fn me(shop: &mut Shop) -> CommandResult {
    require_session(shop).await?;
    let user = shop.profile().await?;
    print_user(&user);
    Ok(())
}

/// Update profile fields.
pub async fn update(
    shop: &mut Shop,
    first_name: Option<String>,
    last_name: Option<String>,
) -> CommandResult {
    let update = ProfileUpdate {
        first_name,
        last_name,
    };
    if update.is_empty() {
        return Err("nothing to update - pass --first-name and/or --last-name".into());
    }

    require_session(shop).await?;
    let user = shop.update_profile(&update).await?;
    println!("Profile updated");
    print_user(&user);
    Ok(())
}

/// Delete the account, its products and orders. Irreversible.
pub async fn delete(shop: &mut Shop, confirmed: bool) -> CommandResult {
    if !confirmed {
        return Err("refusing to delete the account without --yes".into());
    }

    require_session(shop).await?;
    shop.delete_account().await?;
    println!("Account deleted");
    Ok(())
}
