use std::time::Duration;

use anyhow::Context;
use serde_json::Value;

// Usage: probe_player <uid>
// Prints the raw upstream answer for one uid, using PLAYER_API_URL from the environment.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let uid = std::env::args().nth(1).context("usage: probe_player <uid>")?;
    let base_url = std::env::var("PLAYER_API_URL")
        .unwrap_or_else(|_| "https://info.example-game-api.com/api/player".to_string());

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(10))
        .build()?;

    println!("Querying: {}?uid={}", base_url, uid);
    let resp = client.get(&base_url).query(&[("uid", uid.as_str())]).send().await?;

    println!("Status: {}", resp.status());
    let text = resp.text().await?;
    match serde_json::from_str::<Value>(&text) {
        Ok(json) => println!("Response: {:#?}", json),
        Err(_) => println!("Body: {}", text),
    }

    Ok(())
}
