//! genspec
//!
//! Derives a fresh development genesis from a public base chainspec: a new
//! sudo account plus one eight-role key set per validator, merged into the
//! base spec's balances, staking and session sections.
//!
//! Usage:
//!   genspec derive   [--base <name> [--spec-dir <dir>] | --url <url>] [--spec-host <url>]
//!                    [--authorities <n>] [--params <file>] [--format json|yaml|text]
//!                    [--secrets-out <file>]
//!   genspec keygen   [--scheme sr25519|ed25519] [--prefix <n>]
//!   genspec inspect  <ss58>
//!   genspec bases    [--spec-host <url>]

use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use genspec_core::constants::{DEFAULT_SPEC_HOST, DEFAULT_SS58_PREFIX};
use genspec_core::{BaseSpecName, Scheme};
use genspec_crypto::{ss58, CryptoGate};
use genspec_derive::{render_secrets, render_spec, Derivation, Deriver, Format};
use genspec_fetch::{FetchConfig, FileSpecSource, HttpSpecSource, SpecSource};
use genspec_genesis::DerivationParams;

// ── CLI definition ────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(
    name = "genspec",
    version,
    about = "Derive a development chainspec with freshly generated authorities"
)]
struct Args {
    /// Host serving `spec/<name>.json` base specs.
    #[arg(long, global = true, default_value = DEFAULT_SPEC_HOST)]
    spec_host: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch a base spec, generate authorities and print the derived spec.
    Derive {
        /// Base spec to start from.
        #[arg(long, default_value_t = BaseSpecName::Westend)]
        base: BaseSpecName,

        /// Fetch the base spec from this URL instead of a named base.
        #[arg(long, conflicts_with_all = ["spec_dir", "base"])]
        url: Option<String>,

        /// Read `<name>.json` from a local directory instead of the spec host.
        #[arg(long)]
        spec_dir: Option<PathBuf>,

        /// Number of authorities. Defaults to the base spec's staker count.
        #[arg(long)]
        authorities: Option<usize>,

        /// JSON file with sudoBalance / authorityBalance / authorityStake / ss58Prefix.
        #[arg(long)]
        params: Option<PathBuf>,

        /// Output format for the derived spec.
        #[arg(long, default_value = "json")]
        format: Format,

        /// Write the generated secrets (JSON) here. Refuses to overwrite.
        /// Without it the secrets go to stderr.
        #[arg(long)]
        secrets_out: Option<PathBuf>,
    },

    /// Generate a single account and print its phrase and addresses.
    Keygen {
        #[arg(long, default_value_t = Scheme::Sr25519)]
        scheme: Scheme,

        /// SS58 network prefix.
        #[arg(long, default_value_t = DEFAULT_SS58_PREFIX)]
        prefix: u16,
    },

    /// Decode an SS58 address into its prefix and public key.
    Inspect {
        address: String,
    },

    /// List the known base specs and where they are fetched from.
    Bases,
}

// ── Main ─────────────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,genspec=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    match args.command {
        Command::Derive {
            base,
            url,
            spec_dir,
            authorities,
            params,
            format,
            secrets_out,
        } => {
            let params = match params {
                Some(path) => {
                    let path = expand_tilde(&path);
                    DerivationParams::load(&path)
                        .with_context(|| format!("loading params from {}", path.display()))?
                }
                None => DerivationParams::default(),
            };
            let secrets_out = secrets_out.map(|p| expand_tilde(&p));
            if let Some(path) = &secrets_out {
                if path.exists() {
                    bail!(
                        "secrets file already exists at {}. Remove it first or choose another path.",
                        path.display()
                    );
                }
            }

            let derivation = if let Some(dir) = spec_dir {
                let source = FileSpecSource::new(expand_tilde(&dir));
                derive_named(Deriver::new(source, params), base, authorities).await?
            } else {
                let config = FetchConfig {
                    base_url: args.spec_host.trim_end_matches('/').to_string(),
                    ..FetchConfig::default()
                };
                let source = HttpSpecSource::new(&config)?;
                match url {
                    Some(url) => {
                        let spec = source.fetch_url(&url).await?;
                        Deriver::new(source, params)
                            .derive_from_spec(url, spec, authorities)
                            .await?
                    }
                    None => derive_named(Deriver::new(source, params), base, authorities).await?,
                }
            };

            cmd_emit(&derivation, format, secrets_out.as_deref())
        }

        Command::Keygen { scheme, prefix } => cmd_keygen(scheme, prefix).await,

        Command::Inspect { address } => {
            let (prefix, public) = ss58::decode(address.trim())
                .with_context(|| format!("decoding {address}"))?;
            println!("Address:     {}", address.trim());
            println!("SS58 prefix: {prefix}");
            println!("Public key:  {public}");
            Ok(())
        }

        Command::Bases => {
            let host = args.spec_host.trim_end_matches('/');
            for name in BaseSpecName::ALL {
                println!("{:<10} {}", name.as_str(), name.url_on(host));
            }
            Ok(())
        }
    }
}

// ── Commands ──────────────────────────────────────────────────────────────────

async fn derive_named<S: SpecSource>(
    deriver: Deriver<S>,
    base: BaseSpecName,
    authorities: Option<usize>,
) -> anyhow::Result<std::sync::Arc<Derivation>> {
    info!(base = %base, from = %deriver.source().location(base), "deriving");
    let derivation = match authorities {
        Some(n) => deriver.derive_with_count(base, n).await?,
        None => deriver.derive(base).await?,
    };
    Ok(derivation)
}

fn cmd_emit(derivation: &Derivation, format: Format, secrets_out: Option<&Path>) -> anyhow::Result<()> {
    let spec = render_spec(&derivation.spec, format)?;
    println!("{}", spec.trim_end());

    match secrets_out {
        Some(path) => {
            let json = render_secrets(&derivation.secrets, Format::Json)?;
            write_new_file(path, json.as_bytes())?;
            eprintln!("Secrets written to: {}", path.display());
            eprintln!("Keep this file private. Anyone holding it controls every generated account.");
        }
        None => {
            let text = render_secrets(&derivation.secrets, format)?;
            eprintln!("{}", text.trim_end());
        }
    }
    Ok(())
}

async fn cmd_keygen(scheme: Scheme, prefix: u16) -> anyhow::Result<()> {
    let gate = CryptoGate::new();
    gate.ready().await?;
    let account = gate.generator(prefix)?.generate_account(scheme)?;

    println!("Scheme:      {}", account.scheme());
    println!("Phrase:      {}", account.mnemonic.as_str());
    println!("Public key:  {}", account.address_hex);
    println!("SS58:        {}", account.address_ss58);
    println!("\nBACK UP THE PHRASE. It is the only way to recover this account.");
    Ok(())
}

// ── Helpers ──────────────────────────────────────────────────────────────────

/// Create `path` and write `bytes`, failing if something is already there.
fn write_new_file(path: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    let mut file = match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(f) => f,
        Err(e) if e.kind() == ErrorKind::AlreadyExists => {
            bail!("{} already exists; refusing to overwrite", path.display())
        }
        Err(e) => return Err(e).with_context(|| format!("creating {}", path.display())),
    };
    file.write_all(bytes)
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

fn expand_tilde(path: &Path) -> PathBuf {
    if let Ok(stripped) = path.strip_prefix("~") {
        if let Ok(home) = std::env::var("HOME").or_else(|_| std::env::var("USERPROFILE")) {
            return PathBuf::from(home).join(stripped);
        }
    }
    path.to_path_buf()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn derive_defaults() {
        let args = Args::try_parse_from(["genspec", "derive"]).unwrap();
        match args.command {
            Command::Derive { base, format, authorities, url, .. } => {
                assert_eq!(base, BaseSpecName::Westend);
                assert_eq!(format, Format::Json);
                assert!(authorities.is_none());
                assert!(url.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
        assert_eq!(args.spec_host, DEFAULT_SPEC_HOST);
    }

    #[test]
    fn url_and_spec_dir_are_exclusive() {
        let res = Args::try_parse_from([
            "genspec", "derive", "--url", "http://x/spec.json", "--spec-dir", "/tmp",
        ]);
        assert!(res.is_err());
    }

    #[test]
    fn url_replaces_named_base() {
        let res = Args::try_parse_from([
            "genspec", "derive", "--url", "http://x/spec.json", "--base", "kusama",
        ]);
        assert!(res.is_err());

        let ok = Args::try_parse_from(["genspec", "derive", "--url", "http://x/spec.json"]).unwrap();
        assert!(matches!(ok.command, Command::Derive { url: Some(_), .. }));
    }

    #[test]
    fn unknown_base_is_rejected() {
        assert!(Args::try_parse_from(["genspec", "derive", "--base", "moonbeam"]).is_err());
        let ok = Args::try_parse_from(["genspec", "derive", "--base", "Kusama"]).unwrap();
        assert!(matches!(ok.command, Command::Derive { base: BaseSpecName::Kusama, .. }));
    }

    #[test]
    fn write_new_file_refuses_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("secrets.json");
        write_new_file(&path, b"{}").unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"{}");

        let err = write_new_file(&path, b"[]").unwrap_err();
        assert!(err.to_string().contains("refusing to overwrite"));
        assert_eq!(std::fs::read(&path).unwrap(), b"{}");
    }

    #[test]
    fn tilde_is_left_alone_elsewhere() {
        let p = PathBuf::from("/var/lib/genspec");
        assert_eq!(expand_tilde(&p), p);
    }
}
