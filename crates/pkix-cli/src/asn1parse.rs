//! Tree dump of arbitrary BER/DER input.

use std::fs;

use pkix_asn1::{CodecConfig, Parser, SetOrdering};

pub fn run(
    input: &str,
    pem: bool,
    max_depth: usize,
    strict: bool,
    sort_sets: bool,
    out: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let der = crate::load_der(input, pem)?;
    let parser = Parser::new(config(max_depth, strict, sort_sets));
    let blocks = parser.parse_all(&der)?;
    log::debug!("{input}: {} top-level element(s)", blocks.len());

    for block in &blocks {
        print!("{block}");
    }

    if let Some(path) = out {
        let encoded: Vec<u8> = blocks
            .iter()
            .flat_map(|block| block.to_ber_with(parser.config()))
            .collect();
        if encoded != der {
            log::info!("re-encoding differs from the input");
        }
        fs::write(path, &encoded)?;
        println!("wrote {} bytes to {path}", encoded.len());
    }
    Ok(())
}

fn config(max_depth: usize, strict: bool, sort_sets: bool) -> CodecConfig {
    let ordering = if sort_sets {
        SetOrdering::DerSorted
    } else {
        SetOrdering::Preserve
    };
    CodecConfig::builder()
        .max_depth(max_depth)
        .strict_der(strict)
        .set_ordering(ordering)
        .build()
}
