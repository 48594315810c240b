//! The per-session selection state and its cascade invariant.
//!
//! Invariant: a dimension may only hold a value if every dimension before it
//! in [`FilterDimension::ORDER`] also holds one. The resolver enforces this by
//! clearing everything downstream whenever an upstream value changes.

use serde::{Deserialize, Serialize};

use crate::dimension::FilterDimension;
use crate::errors::{FacetError, FacetResult};

/// A value held by one dimension: catalog dimensions and ring size carry ids,
/// diamond size carries a numeric carat value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SelectionValue {
    Id(i64),
    Size(f64),
}

impl SelectionValue {
    pub fn as_id(self) -> Option<i64> {
        match self {
            Self::Id(id) => Some(id),
            Self::Size(_) => None,
        }
    }

    pub fn as_size(self) -> Option<f64> {
        match self {
            Self::Size(v) => Some(v),
            Self::Id(_) => None,
        }
    }
}

/// Current selection across all dimensions. `None` means unresolved/cleared.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Selection {
    pub stone_type: Option<i64>,
    pub design: Option<i64>,
    pub shape: Option<i64>,
    pub setting_style: Option<i64>,
    pub metal: Option<i64>,
    pub quality: Option<i64>,
    pub diamond_size: Option<f64>,
    pub ring_size: Option<i64>,
}

impl Selection {
    pub fn get(&self, dim: FilterDimension) -> Option<SelectionValue> {
        match dim {
            FilterDimension::StoneType => self.stone_type.map(SelectionValue::Id),
            FilterDimension::Design => self.design.map(SelectionValue::Id),
            FilterDimension::Shape => self.shape.map(SelectionValue::Id),
            FilterDimension::SettingStyle => self.setting_style.map(SelectionValue::Id),
            FilterDimension::Metal => self.metal.map(SelectionValue::Id),
            FilterDimension::Quality => self.quality.map(SelectionValue::Id),
            FilterDimension::DiamondSize => self.diamond_size.map(SelectionValue::Size),
            FilterDimension::RingSize => self.ring_size.map(SelectionValue::Id),
        }
    }

    /// Set one dimension. Fails if the value kind does not match the
    /// dimension (an id for diamond size, a size for anything else).
    pub fn set(&mut self, dim: FilterDimension, value: SelectionValue) -> FacetResult<()> {
        match (dim, value) {
            (FilterDimension::DiamondSize, SelectionValue::Size(v)) => self.diamond_size = Some(v),
            (FilterDimension::DiamondSize, SelectionValue::Id(_)) => {
                return Err(FacetError::invalid_argument(
                    "diamondSize takes a numeric size, not an id",
                ))
            }
            (_, SelectionValue::Size(_)) => {
                return Err(FacetError::invalid_argument(format!(
                    "{dim} takes an id, not a numeric size"
                )))
            }
            (FilterDimension::StoneType, SelectionValue::Id(id)) => self.stone_type = Some(id),
            (FilterDimension::Design, SelectionValue::Id(id)) => self.design = Some(id),
            (FilterDimension::Shape, SelectionValue::Id(id)) => self.shape = Some(id),
            (FilterDimension::SettingStyle, SelectionValue::Id(id)) => self.setting_style = Some(id),
            (FilterDimension::Metal, SelectionValue::Id(id)) => self.metal = Some(id),
            (FilterDimension::Quality, SelectionValue::Id(id)) => self.quality = Some(id),
            (FilterDimension::RingSize, SelectionValue::Id(id)) => self.ring_size = Some(id),
        }
        Ok(())
    }

    pub fn clear(&mut self, dim: FilterDimension) {
        match dim {
            FilterDimension::StoneType => self.stone_type = None,
            FilterDimension::Design => self.design = None,
            FilterDimension::Shape => self.shape = None,
            FilterDimension::SettingStyle => self.setting_style = None,
            FilterDimension::Metal => self.metal = None,
            FilterDimension::Quality => self.quality = None,
            FilterDimension::DiamondSize => self.diamond_size = None,
            FilterDimension::RingSize => self.ring_size = None,
        }
    }

    /// Clear every dimension strictly after `dim` (cascade invalidation).
    pub fn clear_downstream(&mut self, dim: FilterDimension) {
        for d in dim.downstream() {
            self.clear(d);
        }
    }

    /// Number of leading, non-null dimensions.
    pub fn resolution_depth(&self) -> usize {
        FilterDimension::ORDER
            .iter()
            .take_while(|d| self.get(**d).is_some())
            .count()
    }

    /// True when every dimension through diamond size is set, i.e. the
    /// product query may fire.
    pub fn is_product_ready(&self) -> bool {
        self.resolution_depth() >= FilterDimension::DiamondSize.index() + 1
    }

    /// True when every catalog dimension upstream of `dim` is set.
    pub fn upstream_complete(&self, dim: FilterDimension) -> bool {
        FilterDimension::ORDER
            .iter()
            .take(dim.index())
            .all(|d| self.get(*d).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn full() -> Selection {
        Selection {
            stone_type: Some(1),
            design: Some(2),
            shape: Some(3),
            setting_style: Some(4),
            metal: Some(5),
            quality: Some(6),
            diamond_size: Some(0.5),
            ring_size: Some(7),
        }
    }

    #[test]
    fn clear_downstream_resets_everything_after() {
        let mut s = full();
        s.clear_downstream(FilterDimension::StoneType);
        assert_eq!(s.stone_type, Some(1));
        assert_eq!(s.design, None);
        assert_eq!(s.diamond_size, None);
        assert_eq!(s.ring_size, None);
        assert_eq!(s.resolution_depth(), 1);
    }

    #[test]
    fn product_ready_requires_all_seven() {
        let mut s = full();
        assert!(s.is_product_ready());
        s.clear(FilterDimension::Quality);
        assert!(!s.is_product_ready());
    }

    #[test]
    fn depth_stops_at_first_gap() {
        let mut s = full();
        s.clear(FilterDimension::Design);
        assert_eq!(s.resolution_depth(), 1);
        // Values past the gap do not count.
        assert!(s.shape.is_some());
    }

    #[test]
    fn set_rejects_kind_mismatch() {
        let mut s = Selection::default();
        assert_matches!(
            s.set(FilterDimension::DiamondSize, SelectionValue::Id(3)),
            Err(crate::FacetError::InvalidArgument(_))
        );
        assert_matches!(
            s.set(FilterDimension::Metal, SelectionValue::Size(0.5)),
            Err(crate::FacetError::InvalidArgument(_))
        );
        s.set(FilterDimension::DiamondSize, SelectionValue::Size(0.5)).unwrap();
        assert_eq!(s.diamond_size, Some(0.5));
    }

    #[test]
    fn upstream_complete_checks_prefix() {
        let mut s = full();
        assert!(s.upstream_complete(FilterDimension::DiamondSize));
        s.clear(FilterDimension::Shape);
        assert!(s.upstream_complete(FilterDimension::Shape));
        assert!(!s.upstream_complete(FilterDimension::SettingStyle));
    }
}
