use std::{path::PathBuf, sync::mpsc, thread, time::Duration};

use clap::{Parser, Subcommand};
use egui::Vec2;
use pitwall::api::OpenF1Client;
use pitwall::dashboard::{ViewModel, start_coordinator};
use pitwall::errors::PitwallError;
use pitwall::ui::live::{LiveDashboardApp, config::AppConfig};
use pitwall::ui::replay::ReplayApp;
use pitwall::writer;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the live dashboard against the stats API
    Live {
        /// Refresh period in seconds; overrides the config file
        #[arg(short, long, value_parser = clap::value_parser!(u64).range(1..))]
        interval: Option<u64>,

        /// Stats API base URL; overrides the config file
        #[arg(short, long)]
        api: Option<String>,

        /// Record every settled snapshot to a JSON lines file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Step through a recorded snapshot file
    Replay {
        #[arg(short, long)]
        input: PathBuf,
    },
}

fn live(
    interval: Option<u64>,
    api: Option<String>,
    output: Option<PathBuf>,
) -> Result<(), PitwallError> {
    let mut app_config = AppConfig::from_local_file().unwrap_or_default();
    if let Some(interval_s) = interval {
        app_config.refresh_interval_s = interval_s;
    }
    if let Some(api_base_url) = api {
        app_config.api_base_url = api_base_url;
    }

    let (snapshot_tx, snapshot_rx) = mpsc::channel::<ViewModel>();

    // if we need to record snapshots we create a second channel and have the
    // coordinator send settled snapshots to both the UI and the writer
    let writer_tx = if let Some(output_file) = output {
        let (writer_tx, writer_rx) = mpsc::channel::<ViewModel>();
        thread::spawn(move || writer::write_snapshots(&output_file, writer_rx));
        Some(writer_tx)
    } else {
        None
    };

    let provider = OpenF1Client::new(&app_config.api_base_url)?;
    let mut refresh_coordinator = start_coordinator(
        provider,
        snapshot_tx,
        writer_tx,
        Duration::from_secs(app_config.refresh_interval_s),
    );

    let window_position = app_config.window_position.clone();
    let mut native_options = eframe::NativeOptions::default();
    native_options.viewport = native_options
        .viewport
        .with_inner_size(Vec2::new(1000., 820.))
        .with_position(window_position);

    eframe::run_native(
        "Pitwall",
        native_options,
        Box::new(|cc| Ok(Box::new(LiveDashboardApp::new(snapshot_rx, app_config, cc)))),
    )
    .expect("could not start app");

    refresh_coordinator.stop();
    Ok(())
}

fn replay(input: &PathBuf) -> Result<(), PitwallError> {
    if !input.exists() {
        return Err(PitwallError::InvalidSnapshotFile {
            path: format!("{:?}", input),
        });
    }
    eframe::run_native(
        "Pitwall Replay",
        eframe::NativeOptions::default(),
        Box::new(|cc| Ok(Box::new(ReplayApp::from_file(input, cc)))),
    )
    .expect("could not start app");
    Ok(())
}

fn main() {
    #[cfg(debug_assertions)]
    colog::init();

    let cli = Args::parse();
    ctrlc::set_handler(move || {
        println!("Exiting...");
        std::process::exit(0);
    })
    .expect("Could not set Ctrl-C handler");
    match &cli.command {
        Commands::Live {
            interval,
            api,
            output,
        } => live(*interval, api.clone(), output.clone())
            .expect("Error while running live dashboard"),
        Commands::Replay { input } => {
            replay(input).expect("Error while replaying snapshot file");
        }
    };
}
