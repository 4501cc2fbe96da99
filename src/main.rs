use clap::Parser;
use color_eyre::eyre::Result;

use cfn_publish::{
    cli::Args, orchestrator::Orchestrator, runner::ProcessRunner,
    storage::ObjectStorePackageStore,
};

fn initialize_logger(debug: bool) -> Result<()> {
    let filter = if debug {
        simplelog::LevelFilter::Debug
    } else {
        simplelog::LevelFilter::Info
    };

    let config = simplelog::ConfigBuilder::new()
        .add_filter_allow_str("cfn_publish")
        .build();

    simplelog::TermLogger::init(
        filter,
        config,
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let args = Args::parse();

    initialize_logger(args.debug)?;

    let config = args.load_config()?;
    let publish_config = args.publish_config(config)?;

    let store = ObjectStorePackageStore::s3(
        &publish_config.bucket_name,
        &publish_config.bucket_region,
    )?;

    let orchestrator = Orchestrator::new(
        publish_config,
        Box::new(store),
        Box::new(ProcessRunner::new()),
    );

    orchestrator.run().await?;

    Ok(())
}
