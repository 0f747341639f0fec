use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Axis along which sprites are concatenated.
///
/// The whole sheet uses one direction; there is no mixing of rows and columns.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Sprites are stacked top to bottom; offsets run along the y axis.
    Vertical,
    /// Sprites are laid out left to right; offsets run along the x axis.
    #[default]
    Horizontal,
}

impl Direction {
    /// Extent of a `w x h` sprite along the layout axis.
    pub fn main_extent(self, w: u32, h: u32) -> u32 {
        match self {
            Direction::Vertical => h,
            Direction::Horizontal => w,
        }
    }

    /// Extent of a `w x h` sprite across the layout axis.
    pub fn cross_extent(self, w: u32, h: u32) -> u32 {
        match self {
            Direction::Vertical => w,
            Direction::Horizontal => h,
        }
    }

    /// Top-left canvas position of a sprite placed at `offset` along the layout axis.
    pub fn position(self, offset: u32) -> (u32, u32) {
        match self {
            Direction::Vertical => (0, offset),
            Direction::Horizontal => (offset, 0),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Vertical => "vertical",
            Direction::Horizontal => "horizontal",
        }
    }
}

impl FromStr for Direction {
    type Err = ();
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "vertical" | "v" => Ok(Self::Vertical),
            "horizontal" | "h" => Ok(Self::Horizontal),
            _ => Err(()),
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Run configuration, built once at startup and passed by reference.
///
/// Input sources are resolved in order: `filelist`, then `glob`, then `files`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SpriteConfig {
    /// Newline-delimited list of image paths; line order is the layout order.
    #[serde(default)]
    pub filelist: Option<PathBuf>,
    /// Shell-style pattern such as `icons/*.png`; matches are sorted by path.
    #[serde(default)]
    pub glob: Option<String>,
    /// Explicit image paths, packed in the given order.
    #[serde(default)]
    pub files: Vec<PathBuf>,
    #[serde(default)]
    pub direction: Direction,
    /// Output image name; its extension selects the encoder.
    #[serde(default = "default_master_name")]
    pub master_name: String,
    /// Run the external PNG crusher on the written master image.
    #[serde(default)]
    pub crush: bool,
}

impl Default for SpriteConfig {
    fn default() -> Self {
        Self {
            filelist: None,
            glob: None,
            files: Vec::new(),
            direction: Direction::default(),
            master_name: default_master_name(),
            crush: false,
        }
    }
}

pub const DEFAULT_MASTER_NAME: &str = "master.png";

fn default_master_name() -> String {
    DEFAULT_MASTER_NAME.to_string()
}

impl SpriteConfig {
    /// Validates the configuration parameters.
    ///
    /// The master name must be non-empty and carry an extension, since the
    /// extension decides the output image format and the stylesheet name.
    pub fn validate(&self) -> crate::error::Result<()> {
        use crate::error::SpriteError;

        if self.master_name.trim().is_empty() {
            return Err(SpriteError::InvalidConfig(
                "master name must not be empty".into(),
            ));
        }
        let master = Path::new(&self.master_name);
        if master.file_stem().is_none() || master.extension().is_none() {
            return Err(SpriteError::InvalidConfig(format!(
                "master name '{}' needs a file extension (e.g. .png)",
                self.master_name
            )));
        }
        if let Some(pattern) = &self.glob {
            if pattern.trim().is_empty() {
                return Err(SpriteError::InvalidConfig(
                    "glob pattern must not be empty".into(),
                ));
            }
        }
        Ok(())
    }

    /// True when at least one input source is configured.
    pub fn has_input_source(&self) -> bool {
        self.filelist.is_some() || self.glob.is_some() || !self.files.is_empty()
    }

    pub fn master_path(&self) -> PathBuf {
        PathBuf::from(&self.master_name)
    }

    /// Stylesheet path: the master name with its extension replaced by `.css`.
    pub fn stylesheet_path(&self) -> PathBuf {
        self.master_path().with_extension("css")
    }

    /// Output path of the crushed master (`name.crushed.ext`).
    pub fn crushed_path(&self) -> Option<PathBuf> {
        crate::crush::crushed_path(&self.master_path())
    }

    /// Create a fluent builder for `SpriteConfig`.
    pub fn builder() -> SpriteConfigBuilder {
        SpriteConfigBuilder::new()
    }
}

/// Builder for `SpriteConfig` for ergonomic construction.
#[derive(Debug, Default, Clone)]
pub struct SpriteConfigBuilder {
    cfg: SpriteConfig,
}

impl SpriteConfigBuilder {
    pub fn new() -> Self {
        Self {
            cfg: SpriteConfig::default(),
        }
    }
    pub fn filelist(mut self, v: impl Into<PathBuf>) -> Self {
        self.cfg.filelist = Some(v.into());
        self
    }
    pub fn glob(mut self, v: impl Into<String>) -> Self {
        self.cfg.glob = Some(v.into());
        self
    }
    pub fn files<I, P>(mut self, v: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.cfg.files = v.into_iter().map(Into::into).collect();
        self
    }
    pub fn direction(mut self, v: Direction) -> Self {
        self.cfg.direction = v;
        self
    }
    pub fn vertical(self) -> Self {
        self.direction(Direction::Vertical)
    }
    pub fn master_name(mut self, v: impl Into<String>) -> Self {
        self.cfg.master_name = v.into();
        self
    }
    pub fn crush(mut self, v: bool) -> Self {
        self.cfg.crush = v;
        self
    }
    pub fn build(self) -> SpriteConfig {
        self.cfg
    }
}
