use std::path::PathBuf;

use image_engine::image_model::Resolution;

use crate::context::Config;

/// Values given here override the config file for this run.
#[derive(Debug, clap::Parser)]
pub struct Cli {
    #[arg(short = 'k', long)]
    pub api_key: Option<String>,

    #[arg(short, long)]
    pub organization: Option<String>,

    #[arg(short, long)]
    pub resolution: Option<Resolution>,

    /// Directory saved images are written to
    #[arg(long)]
    pub picture_dir: Option<PathBuf>,
}

impl Cli {
    fn has_overrides(&self) -> bool {
        self.api_key.is_some()
            || self.organization.is_some()
            || self.resolution.is_some()
            || self.picture_dir.is_some()
    }

    pub fn apply(self, mb_config: Option<Config>) -> Option<Config> {
        if !self.has_overrides() {
            return mb_config;
        }

        let mut cfg = mb_config.unwrap_or_default();
        let model_cfg = &mut cfg.image_model;
        if let Some(key) = self.api_key {
            model_cfg.credentials.api_key = key;
        }
        if let Some(org) = self.organization {
            model_cfg.credentials.organization = Some(org);
        }
        if let Some(resolution) = self.resolution {
            model_cfg.resolution = resolution;
        }
        if let Some(dir) = self.picture_dir {
            cfg.picture_dir = Some(dir);
        }
        Some(cfg)
    }
}

#[cfg(test)]
mod test {
    use clap::Parser;
    use image_engine::config::ImageModelConfig;

    use super::*;

    #[test]
    fn no_arguments_keep_loaded_config() {
        let cli = Cli::parse_from(["image_maker"]);
        assert!(cli.apply(None).is_none());
    }

    #[test]
    fn arguments_override_loaded_config() {
        let loaded = Config {
            image_model: ImageModelConfig::with_api_key("sk-from-file"),
            picture_dir: None,
        };
        let cli = Cli::parse_from(["image_maker", "--resolution", "large", "-k", "sk-from-cli"]);
        let cfg = cli.apply(Some(loaded)).unwrap();
        assert_eq!(cfg.image_model.credentials.api_key, "sk-from-cli");
        assert_eq!(cfg.image_model.resolution, Resolution::Large);
        assert_eq!(cfg.image_model.credentials.organization, None);
    }

    #[test]
    fn arguments_without_config_file() {
        let cli = Cli::parse_from(["image_maker", "--organization", "Personal"]);
        let cfg = cli.apply(None).unwrap();
        assert_eq!(
            cfg.image_model.credentials.organization.as_deref(),
            Some("Personal")
        );
        assert!(!cfg.image_model.has_api_key());
    }
}
