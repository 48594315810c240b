//! Filter dimensions and their fixed resolution order.
//!
//! The order of [`FilterDimension::ORDER`] is normative: it defines which
//! selections are upstream of which, and therefore which selections get
//! cleared when an earlier one changes. It must remain stable.

use serde::{Deserialize, Serialize};

/// One axis of product configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FilterDimension {
    StoneType,
    Design,
    Shape,
    SettingStyle,
    Metal,
    Quality,
    DiamondSize,
    RingSize,
}

impl FilterDimension {
    /// Total resolution order. Earlier entries are upstream of later ones.
    pub const ORDER: [FilterDimension; 8] = [
        FilterDimension::StoneType,
        FilterDimension::Design,
        FilterDimension::Shape,
        FilterDimension::SettingStyle,
        FilterDimension::Metal,
        FilterDimension::Quality,
        FilterDimension::DiamondSize,
        FilterDimension::RingSize,
    ];

    /// The six id-valued catalog dimensions, in order. Diamond size is
    /// numeric and ring size is resolved after the product fetch, so
    /// neither appears here.
    pub const CATALOG: [FilterDimension; 6] = [
        FilterDimension::StoneType,
        FilterDimension::Design,
        FilterDimension::Shape,
        FilterDimension::SettingStyle,
        FilterDimension::Metal,
        FilterDimension::Quality,
    ];

    /// Position in [`Self::ORDER`].
    pub fn index(self) -> usize {
        match self {
            Self::StoneType => 0,
            Self::Design => 1,
            Self::Shape => 2,
            Self::SettingStyle => 3,
            Self::Metal => 4,
            Self::Quality => 5,
            Self::DiamondSize => 6,
            Self::RingSize => 7,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::StoneType => "stoneType",
            Self::Design => "design",
            Self::Shape => "shape",
            Self::SettingStyle => "settingStyle",
            Self::Metal => "metal",
            Self::Quality => "quality",
            Self::DiamondSize => "diamondSize",
            Self::RingSize => "ringSize",
        }
    }

    /// True for the six id-valued catalog dimensions.
    pub fn is_catalog(self) -> bool {
        Self::CATALOG.contains(&self)
    }

    /// Dimensions strictly after `self` in resolution order.
    pub fn downstream(self) -> impl Iterator<Item = FilterDimension> {
        Self::ORDER.into_iter().skip(self.index() + 1)
    }

    /// The dimension immediately after `self`, if any.
    pub fn next(self) -> Option<FilterDimension> {
        Self::ORDER.get(self.index() + 1).copied()
    }
}

impl std::fmt::Display for FilterDimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
