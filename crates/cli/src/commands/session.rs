//! Sign-in, registration and sign-out.

use nextshop_storefront::Storefront;
use nextshop_storefront::models::User;
use nextshop_storefront::services::auth::LoginOutcome;

use super::CliError;

/// Sign in, completing the second factor in the same step when required.
pub async fn login(
    shop: &mut Storefront,
    email: &str,
    password: &str,
    code: Option<&str>,
) -> Result<(), CliError> {
    let user = match shop.login(email, password).await? {
        LoginOutcome::SignedIn(user) => user,
        LoginOutcome::SecondFactorRequired => {
            let Some(code) = code else {
                shop.session_mut().cancel_second_factor();
                return Err(CliError::InvalidArgument(
                    "this account requires a second-factor code, pass --code".to_string(),
                ));
            };
            shop.verify_second_factor(code)?
        }
    };

    tracing::info!("Signed in as {} <{}>", user.name, user.email);
    Ok(())
}

pub async fn register(
    shop: &mut Storefront,
    name: &str,
    email: &str,
    password: &str,
    confirm: &str,
) -> Result<(), CliError> {
    let user = shop.register(name, email, password, confirm).await?;
    tracing::info!("Welcome, {}! Your account is ready.", user.name);
    Ok(())
}

pub fn logout(shop: &mut Storefront) -> Result<(), CliError> {
    if shop.current_user().is_none() {
        tracing::info!("Not signed in");
        return Ok(());
    }
    shop.logout()?;
    tracing::info!("Signed out");
    Ok(())
}

/// Print the signed-in user.
pub fn whoami(shop: &Storefront) -> Result<(), CliError> {
    let Some(user) = shop.current_user() else {
        tracing::info!("Not signed in");
        return Ok(());
    };
    describe(user);

    let summary = shop.account_summary()?;
    tracing::info!(
        "Orders: {}  Spent: {}  Carbon offset: ${:.2}  Donated: ${:.2}",
        summary.order_count,
        summary.total_spent,
        summary.carbon_offset,
        summary.charity_donated
    );
    Ok(())
}

fn describe(user: &User) {
    let initial = user.initial().unwrap_or('?');
    tracing::info!("[{initial}] {} <{}>", user.name, user.email);
    tracing::info!(
        "Role: {}  Two-factor: {}  Member since: {}",
        user.role,
        if user.two_factor_enabled { "on" } else { "off" },
        user.created_at.format("%Y-%m-%d")
    );
}
