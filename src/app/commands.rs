//! Command processing
//!
//! Parses interactive shell input into commands.

use crate::bridge::parse_address;

/// Shell commands that can be executed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppCommand {
    /// Select architecture: arch <name>
    SetArch(String),
    /// Select bit width: mode <bits>, or `mode -` for the default
    SetMode(Option<u32>),
    /// Select byte order: endian <little|big>, or `endian -`
    SetEndian(Option<String>),
    /// Set the base address: base <addr>
    SetBase(u64),
    /// Select operand syntax: syntax <intel|att>, or `syntax -`
    SetSyntax(Option<String>),
    /// Assemble: a <source>, statements separated by ';'
    Assemble(String),
    /// Disassemble: d <hex bytes>
    Disassemble(String),
    /// Print the capability table
    ListArchs,
    /// Show help
    Help,
    /// Quit the shell
    Quit,
    /// Unknown or incomplete command, with the reason
    Unknown(String),
}

/// `-` or `default` resets a setting to the architecture's default
fn is_reset(arg: &str) -> bool {
    matches!(arg, "-" | "default")
}

/// Parse a command string into AppCommand
pub fn parse_command(input: &str) -> AppCommand {
    let input = input.trim();
    let parts: Vec<&str> = input.splitn(2, char::is_whitespace).collect();
    let cmd = parts.first().copied().unwrap_or("");
    let arg = parts.get(1).map(|s| s.trim()).filter(|s| !s.is_empty());

    match cmd {
        "arch" => match arg {
            Some(name) => AppCommand::SetArch(name.to_string()),
            None => AppCommand::Unknown("arch requires a name".into()),
        },
        "mode" => match arg {
            Some(arg) if is_reset(arg) => AppCommand::SetMode(None),
            Some(arg) => match arg.parse() {
                Ok(bits) => AppCommand::SetMode(Some(bits)),
                Err(_) => AppCommand::Unknown(format!("invalid bit width '{}'", arg)),
            },
            None => AppCommand::Unknown("mode requires a bit width".into()),
        },
        "endian" | "e" => match arg {
            Some(arg) if is_reset(arg) => AppCommand::SetEndian(None),
            Some(arg) => AppCommand::SetEndian(Some(arg.to_string())),
            None => AppCommand::Unknown("endian requires little or big".into()),
        },
        "base" | "b" => match arg.map(parse_address) {
            Some(Ok(addr)) => AppCommand::SetBase(addr),
            Some(Err(_)) => AppCommand::Unknown("Invalid address".into()),
            None => AppCommand::Unknown("base requires an address".into()),
        },
        "syntax" => match arg {
            Some(arg) if is_reset(arg) => AppCommand::SetSyntax(None),
            Some(arg) => AppCommand::SetSyntax(Some(arg.to_string())),
            None => AppCommand::Unknown("syntax requires intel or att".into()),
        },
        "a" | "asm" => match arg {
            Some(source) => AppCommand::Assemble(source.replace(';', "\n")),
            None => AppCommand::Unknown("a requires assembly source".into()),
        },
        "d" | "disasm" => match arg {
            Some(hex) => AppCommand::Disassemble(hex.to_string()),
            None => AppCommand::Unknown("d requires hex bytes".into()),
        },
        "archs" => AppCommand::ListArchs,
        "help" | "?" => AppCommand::Help,
        "quit" | "exit" | "q" => AppCommand::Quit,
        _ => AppCommand::Unknown(format!("Unknown command: '{}'", input)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_commands() {
        assert_eq!(parse_command("arch arm64"), AppCommand::SetArch("arm64".into()));
        assert_eq!(parse_command("mode 64"), AppCommand::SetMode(Some(64)));
        assert_eq!(parse_command("mode -"), AppCommand::SetMode(None));
        assert_eq!(parse_command("endian be"), AppCommand::SetEndian(Some("be".into())));
        assert_eq!(parse_command("base 0x401000"), AppCommand::SetBase(0x401000));
        assert_eq!(parse_command("syntax default"), AppCommand::SetSyntax(None));
    }

    #[test]
    fn test_assemble_splits_statements() {
        assert_eq!(
            parse_command("a push rbp; mov rbp, rsp"),
            AppCommand::Assemble("push rbp\n mov rbp, rsp".into())
        );
        assert_eq!(
            parse_command("d 55 48 89 e5"),
            AppCommand::Disassemble("55 48 89 e5".into())
        );
    }

    #[test]
    fn test_missing_arguments() {
        assert!(matches!(parse_command("a"), AppCommand::Unknown(_)));
        assert!(matches!(parse_command("base zz"), AppCommand::Unknown(_)));
        assert!(matches!(parse_command("mode wide"), AppCommand::Unknown(_)));
        assert!(matches!(parse_command("frobnicate"), AppCommand::Unknown(_)));
    }

    #[test]
    fn test_misc_commands() {
        assert_eq!(parse_command("?"), AppCommand::Help);
        assert_eq!(parse_command("archs"), AppCommand::ListArchs);
        assert_eq!(parse_command("  q  "), AppCommand::Quit);
    }
}
