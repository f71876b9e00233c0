/// Fractional digits stored on derived valuation fact fields
pub const DECIMAL_PRECISION: u32 = 8;

/// Metadata key carrying the weighted-average cost per unit on valuation facts
pub const METADATA_KEY_AVG_COST: &str = "avg_cost_per_unit_base";
