//! Tournament Director save file reports
//!
//! Reads a .tdt save file, extracts the tournament, its prize tiers and its
//! players, resolves final standings, and renders a console report and a
//! JSON export.

pub mod error;
pub mod export;
pub mod logger;
pub mod model;
pub mod report;
pub mod standings;
pub mod tdt;

pub use error::{Result, TdtError};
pub use logger::{RunLogger, VerbosityLevel};
pub use model::{Player, Prize, Summary, TournamentInfo, TournamentResults};
pub use report::Report;
pub use standings::resolve;
pub use tdt::TdtFile;
