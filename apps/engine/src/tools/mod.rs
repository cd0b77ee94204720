// Sandboxed tools.
// Implements: tool catalog with parameter schemas, built-in tools, timed executor.
// Handlers are synchronous; the executor moves them onto the blocking pool.

pub mod calc;
pub mod echo;
pub mod executor;
pub mod files;
pub mod pdf;
pub mod registry;

pub use executor::ExecutorSlot;
pub use pdf::{PdfExtractor, TextLayerExtractor};
pub use registry::{ToolArgs, ToolRegistry};
