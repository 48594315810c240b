//! Wire DTOs for the storefront REST API.
//!
//! The API serializes numbers inconsistently (`"1299"` vs `1299`), ships
//! diamond sizes as either bare scalars or `{"size": ...}` objects, and
//! omits fields freely. Everything here decodes defensively: a field that
//! cannot be coerced becomes absent, and conversion into the core models
//! applies the same silent-degradation policy as navigation CSV parsing.

use serde::{Deserialize, Deserializer};

use facet_core::catalog::{NavigationRecord, OptionRecord, ResolvedProduct, RingSizeOption};
use facet_core::estimate::AdjustOp;

/// A number that may arrive as a JSON number or a numeric string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum RawNum {
    Num(f64),
    Str(String),
}

impl RawNum {
    fn as_f64(&self) -> Option<f64> {
        match self {
            RawNum::Num(n) => Some(*n),
            RawNum::Str(s) => s.trim().parse().ok(),
        }
    }

    fn as_i64(&self) -> Option<i64> {
        match self {
            RawNum::Num(n) if n.fract() == 0.0 => Some(*n as i64),
            RawNum::Num(_) => None,
            RawNum::Str(s) => s.trim().parse().ok(),
        }
    }
}

fn de_opt_f64<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
    let raw = Option::<RawNum>::deserialize(d)?;
    Ok(raw.and_then(|r| r.as_f64()))
}

fn de_opt_i64<'de, D: Deserializer<'de>>(d: D) -> Result<Option<i64>, D::Error> {
    let raw = Option::<RawNum>::deserialize(d)?;
    Ok(raw.and_then(|r| r.as_i64()))
}

/// Category-navigation record: six CSV id lists, six defaults, a title.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NavigationWire {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub stone_type_ids: Option<String>,
    #[serde(default)]
    pub design_ids: Option<String>,
    #[serde(default)]
    pub shape_ids: Option<String>,
    #[serde(default)]
    pub setting_style_ids: Option<String>,
    #[serde(default)]
    pub metal_ids: Option<String>,
    #[serde(default)]
    pub quality_ids: Option<String>,
    #[serde(default, deserialize_with = "de_opt_i64")]
    pub default_stone_type: Option<i64>,
    #[serde(default, deserialize_with = "de_opt_i64")]
    pub default_design: Option<i64>,
    #[serde(default, deserialize_with = "de_opt_i64")]
    pub default_shape: Option<i64>,
    #[serde(default, deserialize_with = "de_opt_i64")]
    pub default_setting_style: Option<i64>,
    #[serde(default, deserialize_with = "de_opt_i64")]
    pub default_metal: Option<i64>,
    #[serde(default, deserialize_with = "de_opt_i64")]
    pub default_quality: Option<i64>,
}

impl NavigationWire {
    pub fn into_record(self) -> NavigationRecord {
        NavigationRecord::from_raw(
            self.title.unwrap_or_default(),
            [
                self.stone_type_ids.as_deref().unwrap_or(""),
                self.design_ids.as_deref().unwrap_or(""),
                self.shape_ids.as_deref().unwrap_or(""),
                self.setting_style_ids.as_deref().unwrap_or(""),
                self.metal_ids.as_deref().unwrap_or(""),
                self.quality_ids.as_deref().unwrap_or(""),
            ],
            [
                self.default_stone_type,
                self.default_design,
                self.default_shape,
                self.default_setting_style,
                self.default_metal,
                self.default_quality,
            ],
        )
    }
}

/// One display option for a catalog dimension.
#[derive(Debug, Clone, Deserialize)]
pub struct OptionWire {
    #[serde(default, deserialize_with = "de_opt_i64")]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub origin: Option<String>,
}

impl OptionWire {
    /// Records without a usable id are dropped by the caller.
    pub fn into_record(self) -> Option<OptionRecord> {
        Some(OptionRecord {
            id: self.id?,
            display_name: self.name.unwrap_or_default(),
            image_ref: self.image,
            origin_tag: self.origin,
        })
    }
}

/// Diamond-size candidates arrive as bare numbers, numeric strings, or
/// `{"size": ...}` objects.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SizeWire {
    Object {
        #[serde(default, deserialize_with = "de_opt_f64")]
        size: Option<f64>,
    },
    Scalar(RawNumWrap),
}

/// Public wrapper so `SizeWire` can stay untagged over the private coercion.
#[derive(Debug, Clone, Deserialize)]
pub struct RawNumWrap(#[serde(deserialize_with = "de_opt_f64")] pub Option<f64>);

impl SizeWire {
    pub fn normalize(self) -> Option<f64> {
        match self {
            SizeWire::Object { size } => size,
            SizeWire::Scalar(RawNumWrap(v)) => v,
        }
    }
}

/// The resolved product for a complete selection.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductWire {
    #[serde(default, deserialize_with = "de_opt_i64")]
    pub products_id: Option<i64>,
    #[serde(default)]
    pub products_name: Option<String>,
    #[serde(default, deserialize_with = "de_opt_f64")]
    pub products_price: Option<f64>,
    #[serde(default, deserialize_with = "de_opt_f64")]
    pub total_carat_weight: Option<f64>,
    #[serde(default, deserialize_with = "de_opt_f64")]
    pub estimated_pieces: Option<f64>,
    #[serde(default)]
    pub products_seo_url: Option<String>,
    #[serde(default)]
    pub products_image: Option<String>,
}

impl ProductWire {
    pub fn into_product(self) -> Option<ResolvedProduct> {
        Some(ResolvedProduct {
            id: self.products_id?,
            name: self.products_name.unwrap_or_default(),
            price: self.products_price.unwrap_or(0.0),
            carat_weight: self.total_carat_weight.unwrap_or(0.0),
            estimated_pieces: self.estimated_pieces.unwrap_or(0.0),
            seo_url: self.products_seo_url,
            image_ref: self.products_image,
        })
    }
}

/// One ring-size option with its symbolic adjustments.
#[derive(Debug, Clone, Deserialize)]
pub struct RingOptionWire {
    #[serde(default, deserialize_with = "de_opt_i64")]
    pub value_id: Option<i64>,
    #[serde(default)]
    pub value_name: Option<String>,
    #[serde(default)]
    pub options_symbol: Option<String>,
    #[serde(default, deserialize_with = "de_opt_f64")]
    pub options_price: Option<f64>,
    #[serde(default)]
    pub estimated_symbol: Option<String>,
    #[serde(default, deserialize_with = "de_opt_f64")]
    pub estimated_weight: Option<f64>,
}

impl RingOptionWire {
    pub fn into_option(self) -> Option<RingSizeOption> {
        Some(RingSizeOption {
            value_id: self.value_id?,
            value_name: self.value_name.unwrap_or_default(),
            options_symbol: self.options_symbol.as_deref().and_then(AdjustOp::from_symbol),
            options_price: self.options_price,
            estimated_symbol: self
                .estimated_symbol
                .as_deref()
                .and_then(AdjustOp::from_symbol),
            estimated_weight: self.estimated_weight,
        })
    }
}
