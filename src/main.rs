//! asmbridge - Assemble/disassemble bridge
//!
//! Entry point that handles CLI argument parsing and dispatches to one-shot
//! commands, the line-delimited JSON server, or the interactive shell.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::{self, BufRead, Read, Write};
use std::path::PathBuf;

use asmbridge::app::Session;
use asmbridge::bridge::{parse_address, parse_endianness};
use asmbridge::codec::bytes_from_hex_text;
use asmbridge::ui::cli::{print_archs, print_envelope, run_cli};
use asmbridge::{registry, BridgeConfig, BridgeError, BridgeService, ResponseEnvelope, Syntax};

/// asmbridge: Multi-architecture assembler/disassembler bridge
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Target architecture (X86, X86_64, ARM, ARM64, MIPS, PPC, SPARC)
    #[arg(short, long, global = true, default_value = "X86_64")]
    arch: String,

    /// Bit width (defaults to the architecture's default mode)
    #[arg(short, long, global = true)]
    mode: Option<u32>,

    /// Byte order: little or big
    #[arg(short, long, global = true)]
    endian: Option<String>,

    /// Base address (hex with 0x prefix, or decimal)
    #[arg(short, long, global = true, value_parser = parse_address)]
    base: Option<u64>,

    /// Operand syntax for x86: intel or att
    #[arg(short, long, global = true)]
    syntax: Option<String>,

    /// Print raw response envelopes as JSON
    #[arg(long, global = true, default_value_t = false)]
    json: bool,

    /// Bridge configuration file (JSON)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Assemble source text ('-' reads stdin)
    Asm { source: String },
    /// Disassemble hex bytes ('-' reads stdin)
    Disasm { hex: String },
    /// List supported architectures, modes and byte orders
    Archs,
    /// Serve line-delimited JSON requests on stdin
    Serve,
    /// Interactive shell (default)
    Repl,
}

/// Argument text, or all of stdin for `-`
fn read_input(arg: String) -> Result<String> {
    if arg != "-" {
        return Ok(arg);
    }
    let mut text = String::new();
    io::stdin()
        .read_to_string(&mut text)
        .context("Failed to read stdin")?;
    Ok(text)
}

/// Build the session from the global target options
fn session_from_args(args: &Args) -> Result<Session, BridgeError> {
    let mut session = Session::new(registry().lookup(&args.arch)?);
    session.mode = args.mode;
    session.base_address = args.base.unwrap_or(0);

    if let Some(name) = &args.endian {
        session.endianness = Some(parse_endianness(session.architecture, args.mode, name)?);
    }
    if let Some(name) = &args.syntax {
        let syntax = name
            .parse::<Syntax>()
            .map_err(|name| BridgeError::InvalidRequest(format!("unknown syntax '{}'", name)))?;
        session.syntax = Some(syntax);
    }
    Ok(session)
}

/// Answer one JSON request per stdin line until EOF
fn serve(service: &BridgeService) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();

    for line in stdin.lock().lines() {
        let line = line.context("Failed to read request")?;
        if line.trim().is_empty() {
            continue;
        }

        let envelope = match serde_json::from_str(&line) {
            Ok(message) => service.handle_message(&message),
            Err(e) => ResponseEnvelope::failure(&BridgeError::InvalidRequest(format!(
                "request is not valid JSON: {}",
                e
            ))),
        };
        writeln!(stdout, "{}", envelope.to_json())?;
        stdout.flush()?;
    }

    log::info!("stdin closed, server exiting");
    Ok(())
}

fn main() -> Result<()> {
    // 1. Parse command line arguments
    let args = Args::parse();

    // 2. Initialize logger with verbosity level
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(
        match args.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        },
    ))
    .init();

    log::info!("asmbridge v{} initialized", env!("CARGO_PKG_VERSION"));

    // 3. Load bridge configuration
    let config = match &args.config {
        Some(path) => BridgeConfig::from_json_file(path)?,
        None => BridgeConfig::default(),
    };
    log::debug!("Config: {:?}", config);
    let service = BridgeService::new(config);

    // 4. Dispatch
    log::debug!("Command: {:?}", args.command);

    let envelope = match args.command {
        Some(Command::Archs) => {
            print_archs();
            return Ok(());
        }
        Some(Command::Serve) => return serve(&service),
        Some(Command::Asm { ref source }) => {
            let source = read_input(source.clone())?;
            match session_from_args(&args) {
                Ok(session) => service.assemble(session.assembly_request(source)),
                Err(e) => ResponseEnvelope::failure(&e),
            }
        }
        Some(Command::Disasm { ref hex }) => {
            let hex = read_input(hex.clone())?;
            let request = session_from_args(&args).and_then(|session| {
                let bytes = bytes_from_hex_text(&hex)?;
                Ok(session.disassembly_request(bytes))
            });
            match request {
                Ok(request) => service.disassemble(request),
                Err(e) => ResponseEnvelope::failure(&e),
            }
        }
        Some(Command::Repl) | None => {
            let session = session_from_args(&args)?;
            println!("[*] asmbridge v{} - Interactive Mode", env!("CARGO_PKG_VERSION"));
            return run_cli(&service, session);
        }
    };

    print_envelope(&envelope, args.json);
    if !envelope.ok {
        std::process::exit(1);
    }
    Ok(())
}
