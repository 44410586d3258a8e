//! Session commands: sign in, register, sign out and identify.

use foodverse_client::{AuthResponse, LoginRequest, RegisterRequest, UserStats};
use foodverse_core::{SettingsPatch, StoredAuth, StoredUser};

use crate::output::{format_price, NONE};
use crate::Context;

fn remember(ctx: &mut Context, auth: AuthResponse) -> anyhow::Result<StoredUser> {
    let user = StoredUser {
        id: auth.user.id,
        name: auth.user.name,
        email: auth.user.email,
        user_type: auth.user.user_type,
    };
    ctx.settings.save(SettingsPatch {
        auth: Some(Some(StoredAuth {
            token: auth.token.clone(),
            expires_at: auth.expires_at,
            user: user.clone(),
        })),
        ..SettingsPatch::default()
    })?;
    ctx.client.set_token(Some(auth.token));
    tracing::info!(user_id = user.id, "session stored");
    Ok(user)
}

pub(crate) async fn run_login(
    ctx: &mut Context,
    email: String,
    password: String,
) -> anyhow::Result<()> {
    let auth = ctx
        .client
        .login(&LoginRequest { email, password })
        .await?;
    let user = remember(ctx, auth)?;
    println!("signed in as {} <{}> ({})", user.name, user.email, user.user_type);
    Ok(())
}

pub(crate) async fn run_register(
    ctx: &mut Context,
    request: &RegisterRequest,
) -> anyhow::Result<()> {
    let auth = ctx.client.register(request).await?;
    let user = remember(ctx, auth)?;
    println!("account created; signed in as {} <{}>", user.name, user.email);
    Ok(())
}

pub(crate) fn run_logout(ctx: &mut Context) -> anyhow::Result<()> {
    let previous = ctx.settings.load()?.auth;
    ctx.settings.clear_auth()?;
    ctx.client.set_token(None);
    match previous {
        Some(auth) => println!("signed out {}", auth.user.email),
        None => println!("no active session"),
    }
    Ok(())
}

pub(crate) async fn run_whoami(ctx: &Context) -> anyhow::Result<()> {
    if !ctx.client.has_token() {
        anyhow::bail!("not signed in; run `foodverse login`");
    }
    let (user, stats) = tokio::try_join!(ctx.client.profile(), ctx.client.user_stats())?;
    println!("{} <{}>", user.name, user.email);
    println!("id:   {}", user.id);
    println!("type: {}", user.user_type);
    if let Some(phone) = user.phone.as_deref().filter(|p| !p.is_empty()) {
        println!("phone: {phone}");
    }
    if let Some(address) = user.address.as_deref().filter(|a| !a.is_empty()) {
        println!("address: {address}");
    }
    println!();
    for line in stats_lines(&stats) {
        println!("{line}");
    }
    Ok(())
}

fn stats_lines(stats: &UserStats) -> Vec<String> {
    let favourites = if stats.favorite_categories.is_empty() {
        NONE.to_string()
    } else {
        stats.favorite_categories.join(", ")
    };
    vec![
        format!("orders:    {} ({} completed)", stats.total_orders, stats.completed_orders),
        format!("saved:     {}", format_price(stats.total_savings)),
        format!("favourite: {favourites}"),
    ]
}
