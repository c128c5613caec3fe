// ABOUTME: Reactive shell between panels and the placement engine.
// ABOUTME: Panel hosts, drag and resize plumbing, pass coalescing, and the workspace controller.

pub mod drag;
pub mod panel;
pub mod resize;
pub mod throttle;
pub mod workspace;

pub use drag::{DragMove, DragTracker};
pub use panel::{PanelHost, PanelSpec, RenderRect};
pub use resize::{ResizeCallback, ResizeRegistry, ResizeWatcher, SubscriptionId};
pub use throttle::PassThrottle;
pub use workspace::{Workspace, WorkspaceError, WorkspaceEvent};
