pub mod analysis;
pub mod config;

pub use analysis::{
    AnalysisRecord, AnalysisReport, ClaimResult, EmotionalTone, Identity, RiskLevel, Verdict,
};
pub use config::Config;
