//! Match session: owns the roster, composer and replay engine, and talks to
//! the server and the presentation layer through traits

pub mod driver;
pub mod gateway;
pub mod hooks;
pub mod match_session;
pub mod messages;

pub use driver::run_session;
pub use gateway::{ChannelGateway, ProtocolGateway, RecordingGateway};
pub use hooks::{HookEvent, NoopHooks, PresentationHooks, RecordingHooks};
pub use match_session::{MatchSession, PointerInput, SessionEvent, SessionPhase};
pub use messages::{InboundMessage, OutboundMessage};
