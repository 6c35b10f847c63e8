use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
    time::{SystemTime, UNIX_EPOCH},
};

use color_eyre::{Result, eyre::eyre};
use log::info;
use tokio::{fs, io::AsyncWriteExt};

use crate::image_model::Image;

const LIBRARY_DIR_NAME: &str = "Image Maker";

/// A directory that saved images are written to.
#[derive(Debug, Clone)]
pub struct PhotoLibrary {
    dir: PathBuf,
}

impl PhotoLibrary {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// `Image Maker` inside the user's picture directory, or their home if
    /// the platform has none.
    pub fn default_location() -> Result<Self> {
        let base = dirs::picture_dir()
            .or_else(dirs::home_dir)
            .ok_or(eyre!("Couldn't find a picture or home directory"))?;
        Ok(Self::new(base.join(LIBRARY_DIR_NAME)))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Writes the image into the library and returns its path. Existing files
    /// are never overwritten.
    pub async fn save(&self, image: &Image) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir).await?;

        let stem = format!(
            "image-{}",
            SystemTime::now().duration_since(UNIX_EPOCH)?.as_millis()
        );
        let ext = image.extension();

        let mut attempt = 0u32;
        loop {
            let name = match attempt {
                0 => format!("{stem}.{ext}"),
                n => format!("{stem}-{n}.{ext}"),
            };
            attempt += 1;

            let path = self.dir.join(name);
            let mut file = match fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
            {
                Ok(file) => file,
                Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(e.into()),
            };
            file.write_all(&image.data).await?;
            file.flush().await?;
            info!("Saved image to {}", path.display());
            return Ok(path);
        }
    }
}

#[cfg(test)]
mod test {
    use tempfile::TempDir;

    use super::*;

    const PNG_BYTES: [u8; 10] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 1, 2];

    #[tokio::test]
    async fn saves_into_fresh_directory() -> Result<()> {
        let tmp = TempDir::new()?;
        let library = PhotoLibrary::new(tmp.path().join("nested").join("album"));

        let path = library.save(&Image::new(PNG_BYTES.to_vec())).await?;

        assert_eq!(path.parent(), Some(library.dir()));
        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("png"));
        assert_eq!(std::fs::read(&path)?, PNG_BYTES);
        Ok(())
    }

    #[tokio::test]
    async fn never_overwrites() -> Result<()> {
        let tmp = TempDir::new()?;
        let library = PhotoLibrary::new(tmp.path());

        let first = library.save(&Image::new(vec![0xFF, 0xD8, 0xFF, 1])).await?;
        let second = library.save(&Image::new(vec![0xFF, 0xD8, 0xFF, 2])).await?;

        assert_ne!(first, second);
        assert_eq!(std::fs::read(&first)?, [0xFF, 0xD8, 0xFF, 1]);
        assert_eq!(std::fs::read(&second)?, [0xFF, 0xD8, 0xFF, 2]);
        assert_eq!(std::fs::read_dir(tmp.path())?.count(), 2);
        Ok(())
    }

    #[test]
    fn extension_from_magic_bytes() {
        assert_eq!(Image::new(PNG_BYTES.to_vec()).extension(), "png");
        assert_eq!(Image::new(vec![0xFF, 0xD8, 0xFF, 0xE0]).extension(), "jpg");
        assert_eq!(Image::new(b"RIFF\0\0\0\0WEBPVP8 ".to_vec()).extension(), "webp");
        assert_eq!(Image::new(vec![1u8, 2, 3]).extension(), "img");
    }
}
