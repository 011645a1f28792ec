use crate::api_client::ApiClient;
use crate::filters::Dashboard;
use std::{path::PathBuf, sync::Arc};
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AppState {
    pub data_path: PathBuf,
    pub dashboard: Arc<Mutex<Dashboard>>,
    pub api: Option<ApiClient>,
}

impl AppState {
    pub fn new(data_path: PathBuf, dashboard: Dashboard, api: Option<ApiClient>) -> Self {
        Self {
            data_path,
            dashboard: Arc::new(Mutex::new(dashboard)),
            api,
        }
    }
}
