pub mod admission;
pub mod analysis;
pub mod gemini;

pub use admission::AdmissionController;
pub use analysis::AnalysisService;
pub use gemini::GeminiClient;
