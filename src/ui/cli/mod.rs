//! CLI - reedline-based REPL interface
//!
//! Interactive shell over the bridge: pick a target once, then assemble and
//! disassemble against it. Output helpers are shared with the one-shot
//! subcommands.

use anyhow::Result;
use colored::Colorize;
use reedline::{Prompt, PromptHistorySearch, PromptHistorySearchStatus, Reedline, Signal};
use std::borrow::Cow;

use crate::app::{parse_command, AppCommand, Session};
use crate::arch::{registry, Syntax};
use crate::bridge::{parse_endianness, BridgeService, ResponseEnvelope};
use crate::codec::{bytes_from_hex_text, hex_text_from_bytes};
use crate::error::BridgeError;

/// Prompt showing the current target and base address
pub struct BridgePrompt {
    target: String,
    base_address: u64,
}

impl BridgePrompt {
    pub fn new(session: &Session) -> Self {
        Self {
            target: session.target_label(),
            base_address: session.base_address,
        }
    }

    pub fn update(&mut self, session: &Session) {
        self.target = session.target_label();
        self.base_address = session.base_address;
    }
}

impl Prompt for BridgePrompt {
    fn render_prompt_left(&self) -> Cow<'_, str> {
        Cow::Owned(format!("[{}:{:#x}]", self.target, self.base_address))
    }

    fn render_prompt_right(&self) -> Cow<'_, str> {
        Cow::Borrowed("")
    }

    fn render_prompt_indicator(&self, _prompt_mode: reedline::PromptEditMode) -> Cow<'_, str> {
        Cow::Borrowed("> ")
    }

    fn render_prompt_multiline_indicator(&self) -> Cow<'_, str> {
        Cow::Borrowed("... ")
    }

    fn render_prompt_history_search_indicator(
        &self,
        history_search: PromptHistorySearch,
    ) -> Cow<'_, str> {
        let prefix = match history_search.status {
            PromptHistorySearchStatus::Passing => "",
            PromptHistorySearchStatus::Failing => "(failed) ",
        };
        Cow::Owned(format!("(search: {}{}) ", prefix, history_search.term))
    }
}

/// Print an envelope, either raw JSON or human-readable
pub fn print_envelope(envelope: &ResponseEnvelope, json: bool) {
    if json {
        println!("{}", envelope.to_json());
        return;
    }

    if let Some(data) = &envelope.data {
        let text = data.display_text();
        if !text.is_empty() {
            println!("{}", text);
        }
    }
    if !envelope.ok {
        let kind = envelope
            .error_kind
            .map_or_else(|| "Error".to_string(), |kind| kind.to_string());
        println!(
            "{} {}: {}",
            "[!]".red(),
            kind.red(),
            envelope.error_message.as_deref().unwrap_or("")
        );
    }
}

/// Print the capability table
pub fn print_archs() {
    println!("{}", "Supported Targets".bold().cyan());
    println!("{}", "═".repeat(50).cyan());

    for spec in registry().architectures() {
        let modes = spec
            .modes
            .iter()
            .map(|mode| {
                let endians = mode
                    .endianness
                    .iter()
                    .map(|e| e.to_string())
                    .collect::<Vec<_>>()
                    .join("/");
                format!("{} ({})", mode.mode.bits(), endians)
            })
            .collect::<Vec<_>>()
            .join(", ");
        let syntaxes = spec
            .syntaxes
            .iter()
            .map(|s| s.to_string())
            .collect::<Vec<_>>()
            .join("/");

        println!(
            "  {:<8} {}  default {}/{}  syntax {}",
            spec.arch.name().green(),
            modes,
            spec.default_mode.bits(),
            spec.default_endianness,
            syntaxes.dimmed()
        );
    }
}

/// Print the help message
fn print_help() {
    println!("{}", "asmbridge Shell Commands".bold().cyan());
    println!("{}", "═".repeat(50).cyan());

    println!("\n{}", "Target:".bold().yellow());
    println!("  {}      Select architecture", "arch <name>".green());
    println!("  {}      Select bit width ('-' for default)", "mode <bits>".green());
    println!("  {}    Select byte order (little/big)", "endian <e>".green());
    println!("  {}      Set base address", "base <addr>".green());
    println!("  {}    Select syntax (intel/att)", "syntax <s>".green());
    println!("  {}            List supported targets", "archs".green());

    println!("\n{}", "Code:".bold().yellow());
    println!("  {}       Assemble ('; ' separates statements)", "a <source>".green());
    println!("  {}          Disassemble hex bytes", "d <hex>".green());

    println!("\n{}", "Other:".bold().yellow());
    println!("  {}                Show this help", "?".green());
    println!("  {}                Quit", "q".green());
}

/// Outcome of one shell command
enum Flow {
    Continue,
    Quit,
}

fn report(error: &BridgeError) {
    println!("{} {}: {}", "[!]".red(), error.kind().to_string().red(), error);
}

/// Execute a parsed command against the session
fn execute_command(cmd: AppCommand, service: &BridgeService, session: &mut Session) -> Flow {
    match cmd {
        AppCommand::SetArch(name) => match registry().lookup(&name) {
            Ok(arch) => {
                session.set_architecture(arch);
                println!("[*] Target: {}", session.target_label());
            }
            Err(e) => report(&e),
        },
        AppCommand::SetMode(bits) => {
            session.mode = bits;
            println!("[*] Target: {}", session.target_label());
        }
        AppCommand::SetEndian(None) => session.endianness = None,
        AppCommand::SetEndian(Some(name)) => {
            match parse_endianness(session.architecture, session.mode, &name) {
                Ok(endianness) => session.endianness = Some(endianness),
                Err(e) => report(&e),
            }
        }
        AppCommand::SetBase(addr) => {
            session.base_address = addr;
            println!("[*] Base address: {:#x}", addr);
        }
        AppCommand::SetSyntax(name) => match name.as_deref().map(str::parse::<Syntax>) {
            None => session.syntax = None,
            Some(Ok(syntax)) => session.syntax = Some(syntax),
            Some(Err(name)) => {
                println!("{} Unknown syntax: '{}'", "[!]".red(), name);
            }
        },
        AppCommand::Assemble(source) => {
            match service.run_assemble(session.assembly_request(source)) {
                Ok(result) if result.is_empty() => println!("[*] (no output)"),
                Ok(result) => println!(
                    "[*] {} bytes: {}",
                    result.len(),
                    hex_text_from_bytes(&result.bytes).bold()
                ),
                Err(e) => report(&e),
            }
        }
        AppCommand::Disassemble(hex) => {
            let bytes = match bytes_from_hex_text(&hex) {
                Ok(bytes) => bytes,
                Err(e) => {
                    report(&BridgeError::from(e));
                    return Flow::Continue;
                }
            };
            match service.run_disassemble(session.disassembly_request(bytes)) {
                Ok(disassembly) => {
                    print!("{}", disassembly.format_listing());
                    if let Some(stop) = &disassembly.error {
                        report(&BridgeError::Disassembly(stop.clone()));
                    }
                }
                Err(e) => report(&e),
            }
        }
        AppCommand::ListArchs => print_archs(),
        AppCommand::Help => print_help(),
        AppCommand::Quit => {
            println!("[*] Shutting down...");
            return Flow::Quit;
        }
        AppCommand::Unknown(reason) => {
            println!("{} {}", "[!]".red(), reason);
            println!("    Type '?' for help");
        }
    }
    Flow::Continue
}

/// Run the CLI REPL
pub fn run_cli(service: &BridgeService, mut session: Session) -> Result<()> {
    let mut line_editor = Reedline::create();
    let mut prompt = BridgePrompt::new(&session);

    println!(
        "{}",
        "╔══════════════════════════════════════════════════════════════╗".cyan()
    );
    println!(
        "{}",
        "║  asmbridge shell - Type '?' for help, 'q' to quit            ║".cyan()
    );
    println!(
        "{}",
        "╚══════════════════════════════════════════════════════════════╝".cyan()
    );

    loop {
        let sig = line_editor.read_line(&prompt)?;
        match sig {
            Signal::Success(buffer) => {
                let input = buffer.trim();
                if input.is_empty() {
                    continue;
                }

                let cmd = parse_command(input);
                if let Flow::Quit = execute_command(cmd, service, &mut session) {
                    break;
                }
                prompt.update(&session);
            }
            Signal::CtrlD | Signal::CtrlC => {
                println!("\n[*] Interrupted");
                break;
            }
        }
    }

    Ok(())
}
