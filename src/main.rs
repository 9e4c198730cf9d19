use anyhow::Result;
use clap::Parser;
use log::info;

use fringes::output;
use fringes::settings::{self, CliArgs};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = CliArgs::parse();
    let settings = settings::load_config_with(&args)?;
    info!("{}", settings);

    if args.view {
        return view(settings);
    }

    output::writeup(&settings, args.parallel)?;
    Ok(())
}

#[cfg(feature = "visualization")]
fn view(settings: settings::Settings) -> Result<()> {
    let conf = fringes::viewer::window_conf(&settings);
    macroquad::Window::from_config(conf, fringes::viewer::run(settings));
    Ok(())
}

#[cfg(not(feature = "visualization"))]
fn view(_settings: settings::Settings) -> Result<()> {
    Err(anyhow::anyhow!(
        "The viewer is not available: build with the \"visualization\" feature"
    ))
}
