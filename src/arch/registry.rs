//! Architecture Registry - Static capability table
//!
//! The single place that knows which modes, byte orders and syntaxes each
//! architecture accepts, and which capability implements it. Built once on
//! first use and read-only afterwards.

use once_cell::sync::Lazy;

use super::arm::ArmCapability;
use super::arm64::Arm64Capability;
use super::mips::MipsCapability;
use super::ppc::PpcCapability;
use super::sparc::SparcCapability;
use super::x86::X86Capability;
use super::{Architecture, Endianness, Mode, Syntax, Target};
use crate::backend::Capability;
use crate::error::BridgeError;

static X86: X86Capability = X86Capability;
static ARM: ArmCapability = ArmCapability;
static ARM64: Arm64Capability = Arm64Capability;
static MIPS: MipsCapability = MipsCapability;
static PPC: PpcCapability = PpcCapability;
static SPARC: SparcCapability = SparcCapability;

static REGISTRY: Lazy<ArchitectureRegistry> = Lazy::new(ArchitectureRegistry::builtin);

/// The process-wide registry
pub fn registry() -> &'static ArchitectureRegistry {
    &REGISTRY
}

const LITTLE: &[Endianness] = &[Endianness::Little];
const BIG: &[Endianness] = &[Endianness::Big];
const BOTH: &[Endianness] = &[Endianness::Little, Endianness::Big];
const INTEL_ONLY: &[Syntax] = &[Syntax::Intel];
const INTEL_ATT: &[Syntax] = &[Syntax::Intel, Syntax::Att];

/// One mode an architecture supports
#[derive(Debug, Clone, Copy)]
pub struct ModeSpec {
    pub mode: Mode,
    pub endianness: &'static [Endianness],
}

impl ModeSpec {
    const fn new(mode: Mode, endianness: &'static [Endianness]) -> Self {
        Self { mode, endianness }
    }

    pub fn supports(&self, endianness: Endianness) -> bool {
        self.endianness.contains(&endianness)
    }
}

/// Everything the registry knows about one architecture
pub struct ArchSpec {
    pub arch: Architecture,
    pub modes: Vec<ModeSpec>,
    pub default_mode: Mode,
    pub default_endianness: Endianness,
    pub syntaxes: &'static [Syntax],
    capability: &'static dyn Capability,
}

impl ArchSpec {
    /// Look up a mode by bit width
    pub fn mode(&self, bits: u32) -> Result<&ModeSpec, BridgeError> {
        self.modes
            .iter()
            .find(|spec| spec.mode.bits() == bits)
            .ok_or_else(|| BridgeError::UnsupportedMode {
                arch: self.arch,
                mode: bits,
                supported: self
                    .modes
                    .iter()
                    .map(|spec| spec.mode.bits().to_string())
                    .collect::<Vec<_>>()
                    .join(", "),
            })
    }

    pub fn capability(&self) -> &'static dyn Capability {
        self.capability
    }
}

/// A target that passed validation, with the capability that serves it
#[derive(Clone, Copy)]
pub struct Resolved {
    pub target: Target,
    pub capability: &'static dyn Capability,
}

impl Resolved {
    pub fn min_instruction_len(&self) -> usize {
        self.capability.min_instruction_len(self.target.mode)
    }
}

/// Architecture -> modes -> endianness table
pub struct ArchitectureRegistry {
    specs: Vec<ArchSpec>,
}

impl ArchitectureRegistry {
    fn builtin() -> Self {
        let specs = vec![
            ArchSpec {
                arch: Architecture::X86,
                modes: vec![ModeSpec::new(Mode::Bits32, LITTLE)],
                default_mode: Mode::Bits32,
                default_endianness: Endianness::Little,
                syntaxes: INTEL_ATT,
                capability: &X86,
            },
            ArchSpec {
                arch: Architecture::X86_64,
                modes: vec![ModeSpec::new(Mode::Bits64, LITTLE)],
                default_mode: Mode::Bits64,
                default_endianness: Endianness::Little,
                syntaxes: INTEL_ATT,
                capability: &X86,
            },
            ArchSpec {
                arch: Architecture::ARM,
                modes: vec![ModeSpec::new(Mode::Bits32, BOTH)],
                default_mode: Mode::Bits32,
                default_endianness: Endianness::Little,
                syntaxes: INTEL_ONLY,
                capability: &ARM,
            },
            ArchSpec {
                arch: Architecture::ARM64,
                // Keystone only assembles little-endian AArch64
                modes: vec![ModeSpec::new(Mode::Bits64, LITTLE)],
                default_mode: Mode::Bits64,
                default_endianness: Endianness::Little,
                syntaxes: INTEL_ONLY,
                capability: &ARM64,
            },
            ArchSpec {
                arch: Architecture::MIPS,
                modes: vec![
                    ModeSpec::new(Mode::Bits32, BOTH),
                    ModeSpec::new(Mode::Bits64, BOTH),
                ],
                default_mode: Mode::Bits32,
                default_endianness: Endianness::Little,
                syntaxes: INTEL_ONLY,
                capability: &MIPS,
            },
            ArchSpec {
                arch: Architecture::PPC,
                modes: vec![
                    ModeSpec::new(Mode::Bits32, BIG),
                    ModeSpec::new(Mode::Bits64, BOTH),
                ],
                default_mode: Mode::Bits32,
                default_endianness: Endianness::Big,
                syntaxes: INTEL_ONLY,
                capability: &PPC,
            },
            ArchSpec {
                arch: Architecture::SPARC,
                modes: vec![
                    ModeSpec::new(Mode::Bits32, BIG),
                    ModeSpec::new(Mode::Bits64, BIG),
                ],
                default_mode: Mode::Bits32,
                default_endianness: Endianness::Big,
                syntaxes: INTEL_ONLY,
                capability: &SPARC,
            },
        ];

        Self { specs }
    }

    /// All architectures in declaration order
    pub fn architectures(&self) -> impl Iterator<Item = &ArchSpec> {
        self.specs.iter()
    }

    pub fn spec(&self, arch: Architecture) -> &ArchSpec {
        // Every Architecture variant is registered in builtin()
        self.specs
            .iter()
            .find(|spec| spec.arch == arch)
            .unwrap_or_else(|| unreachable!("{} missing from registry", arch))
    }

    /// Resolve a user-supplied architecture name
    pub fn lookup(&self, name: &str) -> Result<Architecture, BridgeError> {
        name.parse::<Architecture>()
            .map_err(BridgeError::UnsupportedArchitecture)
    }

    /// Validate a request tuple, filling omitted parts with defaults
    pub fn resolve(
        &self,
        arch: Architecture,
        mode: Option<u32>,
        endianness: Option<Endianness>,
        syntax: Option<Syntax>,
    ) -> Result<Resolved, BridgeError> {
        let spec = self.spec(arch);

        let mode_spec = match mode {
            Some(bits) => spec.mode(bits)?,
            None => spec.mode(spec.default_mode.bits())?,
        };

        let endianness = endianness.unwrap_or(spec.default_endianness);
        if !mode_spec.supports(endianness) {
            return Err(BridgeError::unsupported_endianness(
                arch,
                mode_spec.mode,
                endianness,
            ));
        }

        let syntax = syntax.unwrap_or_default();
        if !spec.syntaxes.contains(&syntax) {
            return Err(BridgeError::InvalidRequest(format!(
                "syntax {} is not available for {}",
                syntax, arch
            )));
        }

        let target = Target {
            arch,
            mode: mode_spec.mode,
            endianness,
            syntax,
        };
        log::debug!("Resolved target {}", target);

        Ok(Resolved {
            target,
            capability: spec.capability,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_every_architecture_registered() {
        let reg = registry();
        for arch in Architecture::ALL {
            let spec = reg.spec(arch);
            assert_eq!(spec.arch, arch);
            // Exactly one default mode, and it is a supported one
            assert!(spec.mode(spec.default_mode.bits()).is_ok());
            let default = spec.mode(spec.default_mode.bits()).unwrap();
            assert!(default.supports(spec.default_endianness));
        }
    }

    #[test]
    fn test_defaults_applied() {
        let resolved = registry()
            .resolve(Architecture::PPC, None, None, None)
            .unwrap();
        assert_eq!(resolved.target.mode, Mode::Bits32);
        assert_eq!(resolved.target.endianness, Endianness::Big);
        assert_eq!(resolved.target.syntax, Syntax::Intel);
    }

    #[test]
    fn test_mips_modes() {
        let reg = registry();
        assert!(reg.resolve(Architecture::MIPS, Some(32), Some(Endianness::Big), None).is_ok());
        assert!(reg.resolve(Architecture::MIPS, Some(64), Some(Endianness::Little), None).is_ok());
    }

    #[test]
    fn test_unsupported_mode() {
        let err = registry()
            .resolve(Architecture::X86, Some(64), None, None)
            .err()
            .unwrap();
        assert_eq!(err.kind(), ErrorKind::UnsupportedMode);
        assert!(err.to_string().contains("supported: 32"));
    }

    #[test]
    fn test_x86_big_endian_rejected() {
        let err = registry()
            .resolve(Architecture::X86, Some(32), Some(Endianness::Big), None)
            .err()
            .unwrap();
        assert_eq!(err.kind(), ErrorKind::UnsupportedEndianness);
    }

    #[test]
    fn test_syntax_only_for_x86() {
        let reg = registry();
        assert!(reg.resolve(Architecture::X86_64, None, None, Some(Syntax::Att)).is_ok());
        let err = reg
            .resolve(Architecture::MIPS, None, None, Some(Syntax::Att))
            .err()
            .unwrap();
        assert_eq!(err.kind(), ErrorKind::InvalidRequest);
    }

    #[test]
    fn test_lookup_unknown_name() {
        let err = registry().lookup("RISCV").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedArchitecture);
    }
}
