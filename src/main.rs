// Next-train display for one WMATA station.
extern crate anyhow;
extern crate flexi_logger;
extern crate getopts;
#[macro_use]
extern crate log;
#[macro_use]
extern crate serde_derive;

mod clock;
mod config;
mod debug;
mod display;
mod drawing;
mod poll_loop;
mod prediction;
mod presentation;
mod relative_time;
mod result;
mod wmata;

use anyhow::Context;

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();

    let config = match config::parse_args(&args[1..], std::env::var(config::API_KEY_ENV_VAR).ok())? {
        config::ParsedArgs::Help(usage) => {
            println!("{}", usage);
            return Ok(());
        },
        config::ParsedArgs::Run(config) => config,
    };

    let _logger = flexi_logger::Logger::try_with_env_or_str("info")?
        .log_to_file(flexi_logger::FileSpec::default())
        .duplicate_to_stderr(flexi_logger::Duplicate::Info)
        .start()?;

    info!("Running. station={} one-shot={} save-image={:?}",
          config.station_code, config.one_shot, config.save_image);

    let fetch_fn = wmata::http_fetch_fn(std::time::Duration::from_millis(config.timeout_ms))
        .context("building HTTP client")?;
    let source = wmata::ArrivalSource::new(
        &config.station_code, &config.api_key, &config.base_url, fetch_fn);

    let mut sinks: Vec<Box<dyn display::DisplaySink>> = vec![Box::new(display::LogDisplay::new())];
    if let Some(ref png_out) = config.save_image {
        let image_display = drawing::ImageDisplay::new(&config.font, png_out)
            .with_context(|| format!("loading font {}", config.font))?;
        sinks.push(Box::new(image_display));
    }

    if let Some(port) = config.debug_port {
        let local_png = config.save_image.clone();
        std::thread::spawn(move || {
            if let Err(err) = debug::run_debug_server(port, local_png) {
                error!("Debug server stopped: {}", err);
            }
        });
    }

    let mut poll = poll_loop::PollLoop::new(
        source,
        Box::new(display::FanOutDisplay::new(sinks)),
        Box::new(clock::MonotonicClock::new()),
        config.refresh_ms,
        config.redraw_ms);

    poll.run(config.one_shot);

    return Ok(());
}
