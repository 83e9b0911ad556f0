use std::ops::Range;

use tracing::instrument;

use crate::catalog::ItemCatalog;
use crate::config::PackerConfig;
use crate::error::Result;
use crate::model::{PackStats, Size};
use crate::report::{ContinueSearch, SolutionCallback};
use crate::search::Search;

/// Packs the inserted items into one fixed container.
///
/// Items keep the index `insert` returned for them; every reported [`Placement`](crate::Placement)
/// refers to it. `pack` borrows the packer mutably, so the catalog cannot change while a search
/// is running and a callback cannot start a nested search on the same packer.
#[derive(Debug, Clone)]
pub struct BoxPacker {
    config: PackerConfig,
    catalog: ItemCatalog,
}

impl BoxPacker {
    /// Creates a packer for a `width`×`height` container.
    ///
    /// A zero dimension gives a packer that never reports a solution. Dimensions above
    /// [`MAX_DIMENSION`](crate::MAX_DIMENSION) are rejected.
    pub fn new(width: u32, height: u32, allow_rotation: bool) -> Result<Self> {
        Self::with_config(
            PackerConfig::builder()
                .with_dimensions(width, height)
                .allow_rotation(allow_rotation)
                .build(),
        )
    }

    pub fn with_config(config: PackerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            catalog: ItemCatalog::new(config.allow_rotation),
            config,
        })
    }

    pub fn config(&self) -> &PackerConfig {
        &self.config
    }

    pub fn catalog(&self) -> &ItemCatalog {
        &self.catalog
    }

    /// Items a full solution places. Inserted items with a zero side or that fit the container
    /// in no allowed orientation never appear in a report.
    pub fn placeable_count(&self) -> usize {
        self.catalog.placeable_count(self.config.container())
    }

    /// Adds an item and returns its index.
    pub fn insert(&mut self, size: impl Into<Size>) -> usize {
        self.catalog.insert(size.into())
    }

    /// Adds items in order and returns the indices they were given.
    pub fn insert_all<I>(&mut self, sizes: I) -> Range<usize>
    where
        I: IntoIterator,
        I::Item: Into<Size>,
    {
        self.catalog.insert_all(sizes)
    }

    /// Searches with the configured waste limit, reporting solutions to `callback`.
    pub fn pack<C: SolutionCallback>(&mut self, callback: C) -> PackStats {
        self.pack_with_limit(callback, self.config.waste_limit)
    }

    /// Searches without stopping early; solutions are explored but not observed.
    pub fn pack_all(&mut self) -> PackStats {
        self.pack(ContinueSearch)
    }

    /// Searches with an explicit initial waste ceiling (`None` for unbounded).
    ///
    /// Placements flow only through `callback`; the returned stats describe the run.
    #[instrument(skip_all, fields(width = self.config.width, height = self.config.height, rotation = self.config.allow_rotation))]
    pub fn pack_with_limit<C: SolutionCallback>(
        &mut self,
        mut callback: C,
        waste_limit: Option<u64>,
    ) -> PackStats {
        self.catalog.normalize();
        let container = self.config.container();
        if self.catalog.is_empty() || container.is_empty() {
            return PackStats {
                container_area: container.area(),
                ..Default::default()
            };
        }
        let mut search = Search::new(
            self.catalog.entries(),
            container,
            self.config.allow_rotation,
        );
        search.run(&mut callback, waste_limit.unwrap_or(u64::MAX))
    }
}
