use serde::{Deserialize, Serialize};

use crate::model::Size;

/// Largest container width or height the occupancy grid accepts.
pub const MAX_DIMENSION: u32 = 1 << 16;

/// Container and search configuration.
/// Key notes:
///   - `width`/`height` of zero are accepted and describe a container nothing fits into
///   - `waste_limit` is the initial pruning budget; `None` searches without a ceiling
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PackerConfig {
    /// Container width in cells.
    pub width: u32,
    /// Container height in cells.
    pub height: u32,
    /// Allow 90° rotations of items.
    pub allow_rotation: bool,
    /// Initial waste ceiling: positions reached after skipping this many free cells are pruned.
    #[serde(default)]
    pub waste_limit: Option<u64>,
}

impl PackerConfig {
    pub fn container(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Validates the configuration parameters.
    ///
    /// Returns an error if either container dimension exceeds [`MAX_DIMENSION`].
    pub fn validate(&self) -> crate::error::Result<()> {
        use crate::error::BoxPackerError;

        if self.width > MAX_DIMENSION || self.height > MAX_DIMENSION {
            return Err(BoxPackerError::DimensionsTooLarge {
                width: self.width,
                height: self.height,
                max: MAX_DIMENSION,
            });
        }
        Ok(())
    }
}

/// Builder for `PackerConfig` for ergonomic construction.
#[derive(Debug, Default, Clone)]
pub struct PackerConfigBuilder {
    cfg: PackerConfig,
}

impl PackerConfigBuilder {
    pub fn new() -> Self {
        Self {
            cfg: PackerConfig::default(),
        }
    }
    pub fn with_dimensions(mut self, w: u32, h: u32) -> Self {
        self.cfg.width = w;
        self.cfg.height = h;
        self
    }
    pub fn allow_rotation(mut self, v: bool) -> Self {
        self.cfg.allow_rotation = v;
        self
    }
    pub fn waste_limit(mut self, v: Option<u64>) -> Self {
        self.cfg.waste_limit = v;
        self
    }
    pub fn build(self) -> PackerConfig {
        self.cfg
    }
}

impl PackerConfig {
    /// Create a fluent builder for `PackerConfig`.
    pub fn builder() -> PackerConfigBuilder {
        PackerConfigBuilder::new()
    }
}
