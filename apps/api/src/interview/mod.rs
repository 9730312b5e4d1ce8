// Mock interview sessions: the state machine, live sessions held in memory,
// and the archive that persists them alongside their feedback reports.

pub mod archive;
pub mod handlers;
pub mod registry;
pub mod session;
