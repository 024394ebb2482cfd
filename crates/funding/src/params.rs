use serde::{Deserialize, Serialize};

use crate::errors::{FundingError, FundingResult};

/// Knobs for fee estimation and change handling.
///
/// Sizes are estimates in bytes; amounts are in sats.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FundingParams {
    /// Fee rate, sats per 1000 bytes.
    pub fee_rate_per_kb: u64,

    /// Estimated size a signed input adds.
    pub input_size: usize,

    /// Estimated size an output adds.
    pub output_size: usize,

    /// Change at or below this is left to the fee.
    pub dust_limit: u64,

    /// Value of each split change output.
    pub split_amount: u64,

    /// Most change outputs a single funding run may add, including the final
    /// unsplit one.
    pub max_change_outputs: usize,
}

impl Default for FundingParams {
    fn default() -> Self {
        Self {
            fee_rate_per_kb: 50,
            input_size: 148,
            output_size: 34,
            dust_limit: 10,
            split_amount: 100_000,
            max_change_outputs: 100,
        }
    }
}

impl FundingParams {
    /// Checks that the params can fund anything sensibly.
    pub fn validate(&self) -> FundingResult<()> {
        if self.max_change_outputs == 0 {
            return Err(FundingError::InvalidParams(
                "max_change_outputs must be at least 1",
            ));
        }

        if self.split_amount <= self.dust_limit {
            return Err(FundingError::InvalidParams(
                "split_amount must be above dust_limit",
            ));
        }

        Ok(())
    }

    /// Fee for a transaction of `size` bytes, rounded up to the next sat.
    pub fn fee_for_size(&self, size: usize) -> u64 {
        (size as u64).saturating_mul(self.fee_rate_per_kb).div_ceil(1000)
    }

    /// Fee for one extra output.
    pub fn output_fee(&self) -> u64 {
        self.fee_for_size(self.output_size)
    }
}
