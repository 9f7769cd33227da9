pub mod comparison;
pub mod entry;

pub use comparison::*;
pub use entry::*;

// Emoji markers shared by the terminal and HTML renderers
pub const EMOJI_CHECK: &str = "✅";
pub const EMOJI_WARNING: &str = "⚠️";
pub const EMOJI_QUESTION: &str = "❓";
pub const EMOJI_CROSS: &str = "❌";
pub const EMOJI_MAILBOX: &str = "📭";
