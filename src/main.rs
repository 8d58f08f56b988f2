use std::process;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use rawsniff::capture::interface::{list_devices, select_interface};
use rawsniff::capture::listen::{listen, ListenOptions};
use rawsniff::capture::pcap_source::PcapCapture;
use rawsniff::cli::{Args, Command, ListenArgs, SendArgs};
use rawsniff::config::SnifferConfig;
use rawsniff::error::AppError;
use rawsniff::printer::PacketReport;
use rawsniff::sender::{PacketSender, SendTarget};

fn main() {
    let args = Args::parse();
    init_tracing(&args.log_level);

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("cannot start the runtime: {e}");
            process::exit(1);
        }
    };
    let result = runtime.block_on(run(args.command));
    // the capture thread may still be waiting for a frame
    runtime.shutdown_background();

    if let Err(e) = result {
        eprintln!("{e}");
        process::exit(1);
    }
}

fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(command: Command) -> Result<(), AppError> {
    match command {
        Command::Listen(listen_args) => run_listen(listen_args).await,
        Command::Send(send_args) => run_send(send_args).await,
    }
}

async fn run_listen(listen_args: ListenArgs) -> Result<(), AppError> {
    let file_config = match &listen_args.config {
        Some(path) => SnifferConfig::from_file(path)?,
        None => SnifferConfig::default(),
    };
    let config = listen_args.apply_to(file_config);

    rawsniff::capture::ensure_root()?;
    let interface = select_interface(&list_devices()?, config.interface.as_deref())?;
    let source = PcapCapture::open(&interface, config.recv_buffer_len)?;

    let options = ListenOptions {
        channel_capacity: config.channel_capacity,
        max_frames: config.max_frames,
    };
    let show_payload = config.show_payload;
    listen(source, options, |packet| {
        println!("{}\n", PacketReport::new(packet, show_payload));
    })
    .await?;

    Ok(())
}

async fn run_send(send_args: SendArgs) -> Result<(), AppError> {
    let target = SendTarget::new(&send_args.host, send_args.port)?;
    let sender = PacketSender::create(target, send_args.connect).await?;
    if send_args.connect {
        sender.send(send_args.payload.as_bytes()).await?;
    } else {
        sender.send_to(send_args.payload.as_bytes(), None).await?;
    }
    Ok(())
}
