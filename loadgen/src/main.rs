use std::{process, sync::Arc};

use goose::prelude::*;
use log::{error, info};

use loadgen::{LoadConfig, Result, vision_model};
use payload::PayloadBuilder;

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("loadgen=info,payload=info"),
    )
    .init();

    if let Err(e) = run().await {
        error!("{e}");
        process::exit(1);
    }
}

async fn run() -> Result<()> {
    let config = LoadConfig::from_env()?;
    info!(
        "load testing {} at {} in {} mode",
        config.model, config.host, config.mode
    );

    // Preflight: a bad model name or missing samples stops the run before any
    // user is launched.
    let preflight = PayloadBuilder::new(&config.resources, config.mode).build(&config.model)?;
    info!(
        "preflight built {} bodies for {}",
        preflight.bodies.len(),
        preflight.model_type
    );
    drop(preflight);

    let host = config.host.clone();
    GooseAttack::initialize()?
        .register_scenario(vision_model(Arc::new(config))?)
        .set_default(GooseDefault::Host, host.as_str())?
        .execute()
        .await?;

    info!("load test finished");
    Ok(())
}
