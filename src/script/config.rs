//! Consensus limits applied during evaluation.

/// Maximum script length in bytes.
pub const MAX_SCRIPT_SIZE: usize = 10_000;
/// Maximum bytes in one stack element.
pub const MAX_SCRIPT_ELEMENT_SIZE: usize = 520;
/// Maximum non-push operations per script.
pub const MAX_OPS_PER_SCRIPT: usize = 500;
/// Maximum combined depth of the main and alt stacks.
pub const MAX_STACK_SIZE: usize = 1_000;
/// Maximum number of public keys in a CHECKMULTISIG.
pub const MAX_PUBKEYS_PER_MULTISIG: usize = 20;

/// Limits for one evaluation. The defaults are the consensus values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScriptConfig {
    /// Maximum script length in bytes
    pub max_script_size: usize,
    /// Maximum bytes in one stack element
    pub max_script_element_size: usize,
    /// Maximum non-push operations per script
    pub max_ops_per_script: usize,
    /// Maximum combined main and alt stack depth
    pub max_stack_size: usize,
    /// Maximum byte length of a numeric operand
    pub max_script_num_length: usize,
}

impl Default for ScriptConfig {
    fn default() -> Self {
        ScriptConfig {
            max_script_size: MAX_SCRIPT_SIZE,
            max_script_element_size: MAX_SCRIPT_ELEMENT_SIZE,
            max_ops_per_script: MAX_OPS_PER_SCRIPT,
            max_stack_size: MAX_STACK_SIZE,
            max_script_num_length: crate::script::ScriptNum::DEFAULT_MAX_SIZE,
        }
    }
}
