#![no_main]

use libfuzzer_sys::fuzz_target;

use pricevote_types::{AccountAddress, AssetPair, ValidatorAddress, VoteHash};

// Pairs, addresses and hex hashes arrive as text from feeders and config
// files. Parsing must never panic.
fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    if let Ok(pair) = text.parse::<AssetPair>() {
        assert_eq!(pair.to_string().parse::<AssetPair>().ok(), Some(pair));
    }
    if let Ok(validator) = text.parse::<ValidatorAddress>() {
        let _ = validator.account();
    }
    let _ = text.parse::<AccountAddress>();
    if let Ok(hash) = text.parse::<VoteHash>() {
        assert_eq!(hash.to_string().parse::<VoteHash>().ok(), Some(hash));
    }
});
