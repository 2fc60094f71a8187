use super::AppState;
use crate::core::error::{AppError, Result};
use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
};
use log::info;
use std::path::{Path as FsPath, PathBuf};

/// 按顺序尝试的单据扩展名
pub const DOCUMENT_EXTENSIONS: [&str; 6] = ["pdf", "doc", "docx", "txt", "xlsx", "csv"];

/// 查找交易单据文件
pub fn find_document(dir: &FsPath, trade_number: &str) -> Result<PathBuf> {
    // 单据号只能是单个文件名
    if trade_number.is_empty()
        || trade_number.contains(['/', '\\'])
        || trade_number.contains("..")
    {
        return Err(AppError::DocumentNotFound(format!(
            "No document found for trade {}",
            trade_number
        )));
    }

    if !dir.is_dir() {
        return Err(AppError::DocumentNotFound(
            "Documents directory not found".to_string(),
        ));
    }

    DOCUMENT_EXTENSIONS
        .iter()
        .map(|ext| dir.join(format!("{}.{}", trade_number, ext)))
        .find(|candidate| candidate.is_file())
        .ok_or_else(|| {
            AppError::DocumentNotFound(format!("No document found for trade {}", trade_number))
        })
}

pub async fn get_document(
    State(state): State<AppState>,
    Path(trade_number): Path<String>,
) -> Result<Response> {
    info!("📄 查询交易单据: trade_number={}", trade_number);

    let path = find_document(&state.documents_dir, &trade_number)?;
    let bytes = tokio::fs::read(&path).await?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| trade_number.clone());

    info!("✅ 找到单据: {}", path.display());

    Ok((
        [
            (header::CONTENT_TYPE, "application/octet-stream".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", file_name),
            ),
        ],
        bytes,
    )
        .into_response())
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::super::{create_router, AppState};
    use super::*;
    use axum::body::Body;
    use axum::http::StatusCode;

    #[test]
    fn extension_order_is_respected() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("T1.txt"), b"txt").unwrap();
        std::fs::write(dir.path().join("T1.pdf"), b"pdf").unwrap();

        let found = find_document(dir.path(), "T1").unwrap();
        assert_eq!(found, dir.path().join("T1.pdf"));
    }

    #[test]
    fn rejects_path_like_trade_numbers() {
        let dir = tempfile::tempdir().unwrap();
        for bad in ["../secret", "a/b", "..", ""] {
            assert!(matches!(
                find_document(dir.path(), bad),
                Err(AppError::DocumentNotFound(_))
            ));
        }
    }

    #[tokio::test]
    async fn downloads_existing_document() {
        let dir = tempfile::tempdir().unwrap();
        let docs = dir.path().join("trade_documents");
        std::fs::create_dir(&docs).unwrap();
        std::fs::write(docs.join("T2025001.csv"), b"a,b\n1,2\n").unwrap();

        let app = create_router(AppState::new(store_with(dir.path(), true, true), docs));
        let (status, body) = send(app, "GET", "/document/T2025001", Body::empty()).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"a,b\n1,2\n");
    }

    #[tokio::test]
    async fn missing_directory_is_404() {
        let dir = tempfile::tempdir().unwrap();
        let app = create_router(AppState::new(
            store_with(dir.path(), true, true),
            dir.path().join("nope"),
        ));

        let (status, body) = get_json(app, "/document/T1").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["detail"], "Documents directory not found");
    }
}
