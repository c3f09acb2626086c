use std::process;
use std::sync::Arc;

use futures::future;
use log::error;

use gridload::report::CheckRecorder;
use gridload::runner::Runner;
use gridload::{Registry, RunConfig};

async fn do_main(config: RunConfig) -> anyhow::Result<bool> {
    let registry = Registry::with_fixed_scenarios(&config)?;
    let recorder = Arc::new(CheckRecorder::new());
    let runner = Runner::new(Arc::new(config), recorder.clone())?;

    let runs = registry
        .into_scenarios()
        .into_iter()
        .map(|scenario| runner.run(scenario))
        .collect::<Vec<_>>();
    future::join_all(runs).await;

    let report = recorder.report();
    println!("{}", report);
    Ok(report.all_passed())
}

#[tokio::main]
async fn main() {
    env_logger::init();

    let config = RunConfig::from_env().unwrap_or_else(|err| {
        error!("{}", err);
        process::exit(2);
    });

    match do_main(config).await {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(err) => {
            error!("run failed: {:?}", err);
            process::exit(2);
        }
    }
}
