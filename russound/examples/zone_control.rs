//! Zone control example
//!
//! ```text
//! RNET_HOST=192.168.1.250 RNET_PORT=9621 RUST_LOG=russound=debug \
//!     cargo run --example zone_control
//! ```

use std::time::Duration;

use anyhow::Context;
use tokio::time::sleep;
use tracing_subscriber::EnvFilter;
use russound::Russound;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let host = std::env::var("RNET_HOST").unwrap_or_else(|_| "192.168.1.250".to_string());
    let port: u16 = std::env::var("RNET_PORT")
        .unwrap_or_else(|_| "9621".to_string())
        .parse()
        .context("RNET_PORT must be a port number")?;

    let client = Russound::new(host.clone(), port);
    client
        .connect()
        .await
        .with_context(|| format!("connecting to {}:{}", host, port))?;

    println!("Connected!");

    let (controller, zone) = (1, 1);

    println!("Power on zone {}...", zone);
    client.set_power(controller, zone, 1).await?;
    println!("Power: {:?}", client.get_power(controller, zone).await?);

    println!("Volume 34, first source...");
    client.set_volume(controller, zone, 34).await?;
    client.set_source(controller, zone, 0).await?;

    match client.get_zone_info(controller, zone).await? {
        Some(info) => println!("{}", info),
        None => println!("Controller did not answer"),
    }

    sleep(Duration::from_secs(2)).await;

    println!("Power off zone {}...", zone);
    client.set_power(controller, zone, 0).await?;

    client.close().await?;
    println!("Done!");

    Ok(())
}
