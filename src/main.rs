use std::ffi::OsString;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use log::LevelFilter;
use rsa_xmlkey::{pem_to_xml, xml_to_pem_pair, LineEnding};
use zeroize::Zeroizing;

/// Convert RSA private keys between .NET RSAKeyValue XML and PKCS#1 PEM.
#[derive(Parser, Debug)]
#[command(name = "rsa-xmlkey", version, about)]
struct Args {
    /// Input file: an RSAKeyValue XML document, or a PKCS#1 PEM/DER key with --to-xml
    #[arg(short = 'i', long = "in", value_name = "PATH")]
    input: PathBuf,

    /// The whole input XML document is base64 encoded
    #[arg(short, long)]
    base64: bool,

    /// Write the private key here and the public key to <PATH>.pub instead of stdout
    #[arg(short, long = "out", value_name = "PATH")]
    output: Option<PathBuf>,

    /// Convert a PKCS#1 private key into an RSAKeyValue XML document
    #[arg(long, conflicts_with = "base64")]
    to_xml: bool,

    /// Use CRLF line endings in PEM output
    #[arg(long)]
    crlf: bool,
}

fn main() -> ExitCode {
    env_logger::builder()
        .filter_level(LevelFilter::Warn)
        .parse_default_env()
        .init();

    let args = Args::parse();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> anyhow::Result<()> {
    let input = Zeroizing::new(
        fs::read(&args.input)
            .with_context(|| format!("failed to read {}", args.input.display()))?,
    );
    log::debug!("read {} bytes from {}", input.len(), args.input.display());

    if args.to_xml {
        log::info!("converting PKCS#1 key {} to XML", args.input.display());
        let xml = pem_to_xml(&input)
            .with_context(|| format!("failed to convert {}", args.input.display()))?;

        match &args.output {
            Some(path) => write_private(path, xml.as_bytes())?,
            None => print(&[xml.as_bytes(), b"\n".as_slice()])?,
        }
        return Ok(());
    }

    let line_ending = if args.crlf {
        LineEnding::CRLF
    } else {
        LineEnding::LF
    };

    log::info!("converting XML key {} to PKCS#1", args.input.display());
    log::debug!("input is base64 wrapped: {}", args.base64);
    let pair = xml_to_pem_pair(&input, args.base64, line_ending)
        .with_context(|| format!("failed to convert {}", args.input.display()))?;

    match &args.output {
        Some(path) => {
            write_private(path, pair.private_key.as_bytes())?;

            let public_path = public_key_path(path);
            fs::write(&public_path, pair.public_key.as_bytes())
                .with_context(|| format!("failed to write {}", public_path.display()))?;
            log::info!("wrote public key to {}", public_path.display());
        }
        None => print(&[pair.private_key.as_bytes(), pair.public_key.as_bytes()])?,
    }

    Ok(())
}

/// `<path>.pub`, keeping any existing extension.
fn public_key_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".pub");
    PathBuf::from(name)
}

/// Write secret material readable by the owner only.
fn write_private(path: &Path, contents: &[u8]) -> anyhow::Result<()> {
    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options
        .open(path)
        .with_context(|| format!("failed to create {}", path.display()))?;

    // `mode` only applies to newly created files.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(fs::Permissions::from_mode(0o600))
            .with_context(|| format!("failed to restrict permissions on {}", path.display()))?;
    }

    file.write_all(contents)
        .with_context(|| format!("failed to write {}", path.display()))?;
    log::info!("wrote private key to {}", path.display());
    Ok(())
}

fn print(parts: &[&[u8]]) -> anyhow::Result<()> {
    let mut stdout = io::stdout().lock();
    for part in parts {
        stdout.write_all(part).context("failed to write to stdout")?;
    }
    stdout.flush().context("failed to write to stdout")?;
    Ok(())
}
