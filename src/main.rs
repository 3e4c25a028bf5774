use clap::Parser;
use log::{error, info};
use silence_scheduler::configuration::config::Config;
use silence_scheduler::controller::controller_handler::Controller;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "silence-scheduler")]
#[command(version)]
#[command(about = "Recurring maintenance-window silences for Alertmanager")]
struct Args {
    /// Path to the TOML configuration file
    #[arg(long = "config.file", short = 'c', env = "SILENCE_SCHEDULER_CONFIG")]
    config_file: PathBuf,

    /// Port of the web interface, overrides the configuration file
    #[arg(long = "web.listen-address", short = 'p')]
    listen_port: Option<u16>,
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .format_target(false)
        .init();

    let args = Args::parse();

    info!("Importing configuration");
    let mut config = match Config::from_file(&args.config_file) {
        Ok(config) => config,
        Err(e) => {
            error!("Unable to import configuration from file: {}", e);
            std::process::exit(1);
        }
    };

    if let Some(port) = args.listen_port {
        info!("Web port overridden from the command line: {}", port);
        config.web.port = port;
    }

    let mut controller = match Controller::new(config) {
        Ok(controller) => controller,
        Err(e) => {
            error!("Unable to create a controller instance: {}, exiting...", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = controller.run().await {
        error!("Error occurred in the controller process: {}, exiting...", e);
        std::process::exit(1);
    }
}
