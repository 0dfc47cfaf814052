//! PEM armour (RFC 7468) around DER payloads.

use base64ct::{Base64, Encoding};
use pkix_types::Asn1Error;

/// One `BEGIN`/`END` section and its decoded payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PemBlock {
    pub label: String,
    pub data: Vec<u8>,
}

const BEGIN_PREFIX: &str = "-----BEGIN ";
const END_PREFIX: &str = "-----END ";
const DASHES_SUFFIX: &str = "-----";
const LINE_WIDTH: usize = 64;

/// Parse every PEM block in `input`. Text outside the boundaries is ignored.
pub fn parse(input: &str) -> Result<Vec<PemBlock>, Asn1Error> {
    let mut blocks = Vec::new();
    let mut lines = input.lines();

    while let Some(line) = lines.next() {
        let line = line.trim();
        let Some(label) = line
            .strip_prefix(BEGIN_PREFIX)
            .and_then(|s| s.strip_suffix(DASHES_SUFFIX))
        else {
            continue;
        };
        let end_marker = format!("{END_PREFIX}{label}{DASHES_SUFFIX}");

        let mut base64_data = String::new();
        let mut found_end = false;
        for inner_line in lines.by_ref() {
            let inner_line = inner_line.trim();
            if inner_line == end_marker {
                found_end = true;
                break;
            }
            // RFC 1421 headers such as Proc-Type are not part of the payload
            if inner_line.contains(':') {
                continue;
            }
            base64_data.push_str(inner_line);
        }

        if !found_end {
            return Err(Asn1Error::Pem(format!("missing END line for {label}")));
        }

        let data = Base64::decode_vec(&base64_data)
            .map_err(|e| Asn1Error::Pem(format!("{label}: invalid base64: {e}")))?;
        blocks.push(PemBlock {
            label: label.to_string(),
            data,
        });
    }

    Ok(blocks)
}

/// Parse the first PEM block in `input`, or `None` if it has none.
pub fn parse_one(input: &str) -> Result<Option<PemBlock>, Asn1Error> {
    Ok(parse(input)?.into_iter().next())
}

/// Armour `data` under `label`, 64 base64 characters per line.
pub fn encode(label: &str, data: &[u8]) -> String {
    let base64 = Base64::encode_string(data);
    let mut out = format!("{BEGIN_PREFIX}{label}{DASHES_SUFFIX}\n");

    let mut rest = base64.as_str();
    while !rest.is_empty() {
        let (line, tail) = rest.split_at(rest.len().min(LINE_WIDTH));
        out.push_str(line);
        out.push('\n');
        rest = tail;
    }

    out.push_str(&format!("{END_PREFIX}{label}{DASHES_SUFFIX}\n"));
    out
}
