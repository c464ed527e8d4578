#![no_main]

use libfuzzer_sys::fuzz_target;

use pricevote_crypto::vote_hash;
use pricevote_types::{ExchangeRateTuples, ValidatorAddress};

// Parse arbitrary text as exchange rate tuples. Anything that parses must
// print in a form that parses back to the same text, since commitments
// hash the printed form.
fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(tuples) = text.parse::<ExchangeRateTuples>() else {
        return;
    };

    let printed = tuples.to_string();
    let reparsed: ExchangeRateTuples = printed
        .parse()
        .expect("printed tuples must parse");
    assert_eq!(reparsed.to_string(), printed);

    let voter = ValidatorAddress::new("pvvaloper_fuzz");
    assert_eq!(
        vote_hash("salt", &tuples, &voter),
        vote_hash("salt", &reparsed, &voter)
    );
});
