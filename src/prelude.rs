//! Convenient re-exports for common types and events

pub use crate::MeasurePlugin;
pub use crate::events::EndSession;
pub use crate::events::HitTestSourceFailed;
pub use crate::events::HitTestSourceReady;
pub use crate::events::HitTestSourceReleased;
pub use crate::events::HitTestSourceRequested;
pub use crate::events::LabelCreated;
pub use crate::events::RectangleCompleted;
pub use crate::events::Select;
pub use crate::events::SessionUnsupported;
pub use crate::events::StartSession;
pub use crate::measure::RectangleBuilder;
pub use crate::measure::RectangleStore;
pub use crate::overlay::LabelStyle;
pub use crate::projection::MeasureCamera;
pub use crate::surface::HitResults;
pub use crate::surface::HitTestRequest;
pub use crate::surface::HitTestSource;
pub use crate::surface::Reticle;
