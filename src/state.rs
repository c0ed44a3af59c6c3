use crate::config::IndexConfig;
use crate::models::HabitData;
use std::{path::PathBuf, sync::Arc};
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AppState {
    pub data_path: PathBuf,
    pub config: IndexConfig,
    pub data: Arc<Mutex<HabitData>>,
}

impl AppState {
    pub fn new(data_path: PathBuf, config: IndexConfig, data: HabitData) -> Self {
        Self {
            data_path,
            config,
            data: Arc::new(Mutex::new(data)),
        }
    }
}
