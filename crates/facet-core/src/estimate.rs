//! The estimate calculator: a pure function combining base product metrics
//! with one ring-size option's symbolic adjustments.
//!
//! No state is read or mutated here; the resolver recomputes the estimate
//! whenever the product or the selected ring option changes.

use serde::{Deserialize, Serialize};

use crate::catalog::{ResolvedProduct, RingSizeOption};

/// A symbolic adjustment operator carried by ring-size options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AdjustOp {
    #[serde(rename = "+")]
    Add,
    #[serde(rename = "-")]
    Sub,
    #[serde(rename = "*")]
    Mul,
    #[serde(rename = "/")]
    Div,
}

impl AdjustOp {
    /// Parse a wire symbol. Anything other than the four operators is
    /// treated as absent (no-op), matching the storefront's behavior.
    pub fn from_symbol(s: &str) -> Option<Self> {
        match s.trim() {
            "+" => Some(Self::Add),
            "-" => Some(Self::Sub),
            "*" => Some(Self::Mul),
            "/" => Some(Self::Div),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
        }
    }

    /// Apply the operator to a base value. Division by zero is hardened to a
    /// no-op so no infinity or NaN can reach display values.
    pub fn apply(self, base: f64, operand: f64) -> f64 {
        match self {
            Self::Add => base + operand,
            Self::Sub => base - operand,
            Self::Mul => base * operand,
            Self::Div => {
                if operand == 0.0 {
                    base
                } else {
                    base / operand
                }
            }
        }
    }
}

/// Derived display values for a resolved product under the selected ring size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimateResult {
    pub diamond_pieces: f64,
    pub carat_weight: f64,
    pub price: f64,
}

impl EstimateResult {
    /// Carat weight formatted to two decimal places.
    pub fn carat_display(&self) -> String {
        format!("{:.2}", self.carat_weight)
    }

    /// Price rounded to a whole amount.
    pub fn price_display(&self) -> i64 {
        self.price.round() as i64
    }

    /// Piece count with the raw value trimmed to at most two decimals.
    /// Adjustments can legitimately produce fractional counts; we keep the
    /// fraction visible instead of rounding it away.
    pub fn pieces_display(&self) -> String {
        let s = format!("{:.2}", self.diamond_pieces);
        let s = s.trim_end_matches('0').trim_end_matches('.');
        s.to_string()
    }
}

/// Compute the estimate for a product and the currently selected ring-size
/// option, if any. Pure and idempotent.
pub fn compute(product: &ResolvedProduct, ring: Option<&RingSizeOption>) -> EstimateResult {
    let mut pieces = product.estimated_pieces;
    let mut carat = product.carat_weight;
    let mut price = product.price;

    if let Some(opt) = ring {
        if let (Some(op), Some(weight)) = (opt.options_symbol, opt.estimated_weight) {
            pieces = op.apply(pieces, weight);
        }
        if let (Some(op), Some(weight)) = (opt.estimated_symbol, opt.estimated_weight) {
            carat = op.apply(carat, weight);
        }
        if let (Some(op), Some(extra)) = (opt.options_symbol, opt.options_price) {
            price = op.apply(price, extra);
        }
    }

    EstimateResult {
        diamond_pieces: pieces,
        carat_weight: carat,
        price,
    }
}
