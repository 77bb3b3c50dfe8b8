pub mod countdown;
pub mod dates;
pub mod schedule;
pub mod selection;
pub mod session;

pub use countdown::CountdownTicker;
pub use schedule::{ScheduleIndex, SortDirection, SortKey};
pub use selection::{SelectionState, TileMarker};
pub use session::{FetchOutcome, ScheduleSession};
