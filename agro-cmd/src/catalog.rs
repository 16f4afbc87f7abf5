//! Region catalog listings.

use agro_ee::client::EarthEngineClient;
use log::info;

pub async fn run_states(client: &EarthEngineClient) -> anyhow::Result<()> {
    let states = client.list_states().await?;
    info!("{} states in {}", states.len(), client.catalog().states_asset);
    for name in states {
        println!("{name}");
    }
    Ok(())
}

pub async fn run_municipalities(client: &EarthEngineClient, state: &str) -> anyhow::Result<()> {
    let names = client.list_municipalities(state).await?;
    if names.is_empty() {
        anyhow::bail!("nenhum município pertence a {state:?}; confira a grafia com `states`");
    }
    info!("{} municipalities in {}", names.len(), state);
    for name in names {
        println!("{name}");
    }
    Ok(())
}
