//! Terminal walkthrough of the Duckcross client core.
//!
//! Restores a persisted session (or logs in with `DUCKCROSS_EMAIL` /
//! `DUCKCROSS_PASSWORD`), prints the profile's favorites, then fetches
//! one station-status snapshot and renders a small board.
//!
//! ```text
//! DUCKCROSS_EMAIL=a@b.com DUCKCROSS_PASSWORD=... cargo run -p status-cli
//! ```

use duckcross::prelude::*;

#[tokio::main]
async fn main() -> Result<(), DuckcrossError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let mut client = DuckcrossClient::builder().build()?;

    if client.restore().await {
        tracing::info!("restored persisted session");
    } else {
        let email = std::env::var("DUCKCROSS_EMAIL").unwrap_or_default();
        let password =
            std::env::var("DUCKCROSS_PASSWORD").unwrap_or_default();
        if email.is_empty() || password.is_empty() {
            eprintln!(
                "no persisted session; set DUCKCROSS_EMAIL and \
                 DUCKCROSS_PASSWORD to log in"
            );
            std::process::exit(1);
        }
        client.login(&email, &password).await?;
        client.load_profile().await?;
        tracing::info!(user_id = ?client.user_id(), "logged in");
    }

    if let Some(profile) = client.profile() {
        println!("favorite stations:");
        for station in &profile.favorite_stations {
            println!("  ★ {station}");
        }
        if profile.needs_welcome {
            println!("(onboarding pending for this account)");
        }
    }

    client.refresh_station_data().await?;
    let snapshot = client.station_snapshot();
    println!("\nstation status ({} stations):", snapshot.data.len());
    for station in &snapshot.data {
        let marker = match station.status {
            StationStatus::Ok => " ",
            StationStatus::Warn => "!",
            StationStatus::Delay => "✗",
        };
        println!("  [{marker}] {:12} {}", station.name, station.message);
    }

    Ok(())
}
