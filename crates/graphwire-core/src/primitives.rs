//! # Protocol Primitives
//!
//! Hardcoded constants shared by the graph model, the attribute projector
//! and the wire codecs. These are compiled into the binary and immutable
//! at runtime.

/// Column identity of the reserved entity-identifier column. The projector
/// never exports this cell; the identifier travels in the event itself.
pub const ID_COLUMN_INDEX: u32 = 0;

/// Display title of the reserved identifier column.
pub const ID_COLUMN_TITLE: &str = "id";

/// Visualization field keys appended by the projector when visualization
/// data is enabled. Position and color are common to nodes and edges.
pub const VIZ_X: &str = "x";
pub const VIZ_Y: &str = "y";
pub const VIZ_Z: &str = "z";
pub const VIZ_R: &str = "r";
pub const VIZ_G: &str = "g";
pub const VIZ_B: &str = "b";

/// Visualization size key, nodes only.
pub const VIZ_SIZE: &str = "size";

/// Visualization weight key, edges only.
pub const VIZ_WEIGHT: &str = "weight";

/// Format key of the built-in line-based text codec.
pub const FORMAT_DGS: &str = "dgs";

/// Format key of the built-in JSON-lines codec.
pub const FORMAT_JSON: &str = "json";

/// Header line written by the DGS encoder and required by the decoder.
pub const DGS_HEADER: &str = "DGS004";

// =============================================================================
// INPUT VALIDATION LIMITS
// =============================================================================

/// Maximum accepted length of a single decoded input line.
///
/// Lines longer than this are rejected by the built-in decoders to prevent
/// memory exhaustion from malicious or malformed input.
pub const MAX_LINE_LENGTH: usize = 1024 * 1024;

/// Maximum accepted length of an attribute column title.
pub const MAX_TITLE_LENGTH: usize = 256;
