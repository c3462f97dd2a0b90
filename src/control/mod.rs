//! Live control: intersections, controllers, feeds, and the supervisor.
//!
//! ```text
//! Roster CSV ─► SignalSite[]          (which signals to drive)
//!                    │
//!                    ▼
//!  Intersection + VehicleCounter ─► IntersectionController ──┐
//!  Intersection + VehicleCounter ─► IntersectionController ──┼─► Bus
//!  external NDJSON stream        ─► EventFeed ───────────────┘
//!                    ▲
//!              Supervisor spawns controllers, bridges Bus → SubscriberSet,
//!              and owns graceful shutdown.
//! ```

mod controller;
mod feed;
mod intersection;
mod roster;
mod shutdown;
mod supervisor;

pub use controller::IntersectionController;
pub use feed::EventFeed;
pub use intersection::{Intersection, Lane, Phase};
pub use roster::{load_roster, load_roster_path, SignalSite};
pub use supervisor::Supervisor;
