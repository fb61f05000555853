//! Preprocessing configuration format.

use crate::{common::*, resize::ResizeConfig, ResizeMode};

/// The main configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub image: ImageConfig,
}

impl Config {
    pub fn open<P>(path: P) -> Result<Self>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file '{}'", path.display()))?;
        let config = json5::from_str(&text)
            .with_context(|| format!("failed to parse config file '{}'", path.display()))?;
        Ok(config)
    }
}

/// Image resizing options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageConfig {
    /// The shorter side is scaled up to at least this length.
    pub image_min_dim: Option<usize>,
    /// The minimum scaling factor, checked after `image_min_dim`.
    pub image_min_scale: Option<R64>,
    /// The longer side is bounded by this length in square mode.
    pub image_max_dim: Option<usize>,
    pub image_resize_mode: ResizeMode,
}

impl ImageConfig {
    pub fn resize_config(&self) -> ResizeConfig {
        ResizeConfig {
            min_dim: self.image_min_dim,
            min_scale: self.image_min_scale,
            max_dim: self.image_max_dim,
            mode: self.image_resize_mode,
        }
    }
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            image_min_dim: Some(800),
            image_min_scale: None,
            image_max_dim: Some(1024),
            image_resize_mode: ResizeMode::Square,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_json5_config() {
        let text = r#"{
            // resize options
            image: {
                image_min_dim: 512,
                image_min_scale: 1.0,
                image_max_dim: 640,
                image_resize_mode: "pad64",
            },
        }"#;
        let config: Config = json5::from_str(text).unwrap();
        let resize = config.image.resize_config();
        assert_eq!(resize.min_dim, Some(512));
        assert_eq!(resize.min_scale, Some(r64(1.0)));
        assert_eq!(resize.max_dim, Some(640));
        assert_eq!(resize.mode, ResizeMode::Pad64);
    }

    #[test]
    fn missing_image_section_uses_defaults() {
        let config: Config = json5::from_str("{}").unwrap();
        assert_eq!(config.image, ImageConfig::default());
    }
}
