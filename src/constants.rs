/// The directory name this tool exists to remove.
pub const NODE_MODULES: &str = "node_modules";

/// Default `--age` value when none is given.
pub const DEFAULT_AGE: &str = "3m";
