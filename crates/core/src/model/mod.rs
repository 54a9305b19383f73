//! Domain objects: Agents, DiSCOs and Events, plus request and search types

pub mod agent;
pub mod disco;
pub mod event;
pub mod request;
pub mod status;

pub use agent::Agent;
pub use disco::Disco;
pub use event::{Event, EventDetail, EventType, TargetType};
pub use request::{DateRange, OrderBy, RequestEventDetails, ResultBatch, SearchParams, StatusFilter};
pub use status::{ObjectType, Status};
