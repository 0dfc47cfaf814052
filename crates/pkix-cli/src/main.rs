use std::fs;

use clap::{ArgAction, Parser, Subcommand};

mod asn1parse;
mod crl;
mod int_cmd;
mod oid_cmd;
mod pem_cmd;
mod x509cmd;

/// pkix command-line tool for inspecting ASN.1 and PKI objects.
#[derive(Parser)]
#[command(name = "pkix")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the element tree of a BER/DER file.
    Asn1parse {
        /// Input file.
        file: String,
        /// Force PEM decoding of the input.
        #[arg(long)]
        pem: bool,
        /// Nesting limit for constructed values.
        #[arg(long, default_value_t = 64)]
        max_depth: usize,
        /// Reject encodings that are not canonical DER.
        #[arg(long)]
        strict: bool,
        /// Sort SET members by encoding when re-encoding.
        #[arg(long)]
        sort_sets: bool,
        /// Write the re-encoded elements to this file.
        #[arg(short, long)]
        out: Option<String>,
    },
    /// Convert between PEM and DER framing.
    Pem {
        /// Input file.
        file: String,
        /// PEM in, DER out.
        #[arg(long, conflicts_with = "to_pem")]
        to_der: bool,
        /// DER in, PEM out.
        #[arg(long)]
        to_pem: bool,
        /// PEM label for --to-pem.
        #[arg(short, long, default_value = "CERTIFICATE")]
        label: String,
        /// Output file (stdout if omitted).
        #[arg(short, long)]
        out: Option<String>,
    },
    /// Encode a dotted OID or decode a hex DER OID.
    Oid {
        /// `2.5.4.3` or `06 03 55 04 03`.
        value: String,
    },
    /// Print the DER encoding of an integer.
    Int {
        /// Decimal, or hex with a `0x` prefix.
        value: String,
    },
    /// Summarize an X.509 certificate.
    X509 {
        /// Input certificate file (PEM or DER).
        file: String,
    },
    /// Summarize a CRL.
    Crl {
        /// Input CRL file (PEM or DER).
        file: String,
    },
}

fn log_level(verbose: u8) -> log::LevelFilter {
    match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    }
}

/// Read `path` as DER, decoding the first PEM block when `pem` is set or the
/// file looks like PEM.
pub(crate) fn load_der(path: &str, pem: bool) -> Result<Vec<u8>, Box<dyn std::error::Error>> {
    let data = fs::read(path)?;
    let looks_like_pem = data.trim_ascii_start().starts_with(b"-----BEGIN ");
    if !pem && !looks_like_pem {
        return Ok(data);
    }
    let text = std::str::from_utf8(&data).map_err(|_| format!("{path} is not PEM text"))?;
    match pkix_asn1::pem::parse_one(text)? {
        Some(block) => {
            log::info!("{path}: PEM block {} ({} bytes)", block.label, block.data.len());
            Ok(block.data)
        }
        None => Err(format!("no PEM blocks found in {path}").into()),
    }
}

fn main() {
    let cli = Cli::parse();
    env_logger::Builder::new()
        .filter_level(log_level(cli.verbose))
        .parse_default_env()
        .init();

    let result = match &cli.command {
        Commands::Asn1parse {
            file,
            pem,
            max_depth,
            strict,
            sort_sets,
            out,
        } => asn1parse::run(file, *pem, *max_depth, *strict, *sort_sets, out.as_deref()),
        Commands::Pem {
            file,
            to_der,
            to_pem,
            label,
            out,
        } => pem_cmd::run(file, *to_der, *to_pem, label, out.as_deref()),
        Commands::Oid { value } => oid_cmd::run(value),
        Commands::Int { value } => int_cmd::run(value),
        Commands::X509 { file } => x509cmd::run(file),
        Commands::Crl { file } => crl::run(file),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level() {
        assert_eq!(log_level(0), log::LevelFilter::Warn);
        assert_eq!(log_level(2), log::LevelFilter::Debug);
        assert_eq!(log_level(9), log::LevelFilter::Trace);
    }

    #[test]
    fn test_cli_parses() {
        let cli = Cli::try_parse_from(["pkix", "-vv", "asn1parse", "a.der", "--strict"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.command, Commands::Asn1parse { strict: true, max_depth: 64, .. }));
        assert!(Cli::try_parse_from(["pkix", "pem", "a", "--to-der", "--to-pem"]).is_err());
    }
}
