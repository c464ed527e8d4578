//! Events emitted by the coordinator for the node to process.

use pricevote_types::{AssetPair, ValidatorAddress};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum OracleEvent {
    PrevoteAccepted {
        voter: ValidatorAddress,
        period: u64,
    },
    VoteAccepted {
        voter: ValidatorAddress,
        period: u64,
    },
    /// A submission was refused; nothing was stored.
    SubmissionRejected {
        voter: ValidatorAddress,
        reason: String,
    },
    ExchangeRatePublished {
        pair: AssetPair,
        exchange_rate: Decimal,
        period: u64,
    },
    /// Miss counter incremented for the settled period.
    ValidatorMissed {
        validator: ValidatorAddress,
        miss_count: u64,
    },
    /// Window closed with this validator above the maximum miss rate.
    SlashFlagged {
        validator: ValidatorAddress,
        miss_count: u64,
        slash_fraction_bps: u32,
    },
    PeriodSettled {
        period: u64,
        block_height: u64,
    },
}
