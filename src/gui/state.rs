use crate::config::DetectorConfig;

#[derive(Debug, Default)]
pub struct AppState {
    pub config: DetectorConfig,
    /// Number of uploads processed successfully this session
    pub processed: usize,
}
