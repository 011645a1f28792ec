use crate::errors::AppError;
use crate::models::FilterState;
use std::path::Path;
use tokio::fs;
use tracing::error;

pub async fn load_filters(path: &Path) -> FilterState {
    match fs::read(path).await {
        Ok(bytes) => match serde_json::from_slice(&bytes) {
            Ok(filters) => filters,
            Err(err) => {
                error!("failed to parse filter state: {err}");
                FilterState::default()
            }
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => FilterState::default(),
        Err(err) => {
            error!("failed to read filter state: {err}");
            FilterState::default()
        }
    }
}

pub async fn persist_filters(path: &Path, filters: &FilterState) -> Result<(), AppError> {
    let payload = serde_json::to_vec_pretty(filters).map_err(AppError::internal)?;
    fs::write(path, payload).await.map_err(AppError::internal)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> std::path::PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!("school_dashboard_{}_{name}.json", std::process::id()));
        path
    }

    #[tokio::test]
    async fn missing_file_yields_defaults() {
        let path = temp_path("missing");
        let _ = fs::remove_file(&path).await;
        assert_eq!(load_filters(&path).await, FilterState::default());
    }

    #[tokio::test]
    async fn corrupt_file_yields_defaults() {
        let path = temp_path("corrupt");
        fs::write(&path, b"{not json").await.unwrap();
        assert_eq!(load_filters(&path).await, FilterState::default());
        let _ = fs::remove_file(&path).await;
    }

    #[tokio::test]
    async fn persisted_state_loads_back() {
        let path = temp_path("roundtrip");
        let filters = FilterState {
            city: "Атырау".to_string(),
            selected_schools: vec![20, 21],
            ..FilterState::default()
        };
        persist_filters(&path, &filters).await.unwrap();
        assert_eq!(load_filters(&path).await, filters);
        let _ = fs::remove_file(&path).await;
    }
}
