// ABOUTME: Panel packing for dashboard workspaces.
// ABOUTME: Corner frontier, greedy placement passes, and drag-aware processing order.

mod engine;
mod frontier;
mod reorder;

pub use engine::{Layout, LayoutError, Packer};
pub use frontier::{Corner, Frontier, Placed};
pub use reorder::{processing_order, DragOverride, ProcessingOrder};
