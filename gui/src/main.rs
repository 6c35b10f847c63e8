use clap::Parser;
use color_eyre::Result;
use image_maker::{APP_NAME, Gui, cli::Cli, load_config};

pub fn main() -> Result<()> {
    pretty_env_logger::init();
    color_eyre::install()?;
    let cfg = Cli::parse().apply(load_config()?);
    let photos = cfg.clone().unwrap_or_default().photo_library()?;
    log::info!("Saving images to {}", photos.dir().display());
    iced::application(
        move || Gui::new(cfg.clone(), photos.clone()),
        Gui::update,
        Gui::view,
    )
    .subscription(Gui::subscription)
    .title(APP_NAME)
    .run()?;
    Ok(())
}
