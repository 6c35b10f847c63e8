use std::path::PathBuf;

use clap::Parser;
use color_eyre::Result;
use image_engine::{
    config::{Credentials, ImageModelConfig},
    generator::ImageGenerator,
    image_model::Resolution,
    photo_library::PhotoLibrary,
};

/// Generates one image and writes it to disk.
#[derive(clap::Parser)]
struct Arg {
    key: String,
    prompt: String,

    #[arg(short, long, default_value = "medium")]
    resolution: Resolution,

    #[arg(long)]
    organization: Option<String>,

    /// Output file. Defaults to a new file in the picture library.
    #[arg(short, long)]
    out: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    pretty_env_logger::init();
    color_eyre::install()?;
    let Arg {
        key,
        prompt,
        resolution,
        organization,
        out,
    } = Arg::parse();

    let mut generator = ImageGenerator::new(ImageModelConfig {
        credentials: Credentials {
            organization,
            api_key: key,
        },
        resolution,
        ..Default::default()
    });
    generator.initialize();

    let image = generator.generate_image(prompt).await?;
    let path = match out {
        Some(path) => {
            tokio::fs::write(&path, &image.data).await?;
            path
        }
        None => PhotoLibrary::default_location()?.save(&image).await?,
    };
    println!("Saved image to {}, {} bytes", path.display(), image.data.len());

    Ok(())
}
