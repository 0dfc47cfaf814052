#![no_main]
use libfuzzer_sys::fuzz_target;
use pkix_asn1::{Block, CodecConfig, Parser};

fuzz_target!(|data: &[u8]| {
    let Ok(block) = Block::from_ber(data) else {
        return;
    };
    // Unmodified trees reproduce their input exactly.
    assert_eq!(&*block.preserved_encoding(), data);

    // Re-encoding is canonical: it parses and encodes to itself.
    let der = block.to_ber();
    assert_eq!(der.len(), block.encoded_len());
    let again = Block::from_ber(&der).expect("re-encoding must parse");
    assert_eq!(again.to_ber(), der);
    assert_eq!(again, block);

    let _ = Parser::new(CodecConfig::der()).parse(data);
    let _ = block.to_string();
});
