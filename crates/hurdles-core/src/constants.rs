/// Upper bound on game objects a single world may own. Object ids are `u32`.
pub const MAX_WORLD_OBJECTS: usize = 1 << 20;

/// Widest literal that still converts to an integer phenotype parameter.
pub const MAX_INTEGER_BITS: usize = u64::BITS as usize;

/// Prefix of the canonical bit-string representation.
pub const BIT_STRING_PREFIX: &str = "0b";

/// Version tag written into every [`crate::report::AlgorithmReport`].
pub const REPORT_SCHEMA_VERSION: u32 = 1;
