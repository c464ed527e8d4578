#![no_main]

use libfuzzer_sys::fuzz_target;

// Decode arbitrary bytes as every record the LMDB backend stores.
// Corrupt records must surface as errors, never panics.
fuzz_target!(|data: &[u8]| {
    let _ = bincode::deserialize::<pricevote_types::Prevote>(data);
    let _ = bincode::deserialize::<pricevote_types::Vote>(data);
    let _ = bincode::deserialize::<pricevote_types::AggregatedExchangeRate>(data);
    let _ = bincode::deserialize::<pricevote_types::OracleParams>(data);
    let _ = bincode::deserialize::<pricevote_types::ExchangeRateTuples>(data);
});
