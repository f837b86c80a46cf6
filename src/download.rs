//! The members-only file download. Only reachable through the auth middleware.

use std::path::PathBuf;

use axum::{
    extract::{FromRef, State},
    http::header,
    response::{IntoResponse, Response},
};

use crate::{AppState, html::render_internal_server_error, user_store::UserStore};

/// The file served by the download route, relative to the assets directory.
pub const DOWNLOAD_FILE_NAME: &str = "cheat_sheet.pdf";

/// The state needed for the download route.
#[derive(Debug, Clone)]
pub struct DownloadState {
    /// The directory containing [DOWNLOAD_FILE_NAME].
    pub assets_dir: PathBuf,
}

impl<U> FromRef<AppState<U>> for DownloadState
where
    U: UserStore + Clone + Send + Sync,
{
    fn from_ref(state: &AppState<U>) -> Self {
        Self {
            assets_dir: state.assets_dir.clone(),
        }
    }
}

/// Serve the gated file as a download.
///
/// The file is read per request rather than held in memory, so it can be
/// swapped on disk without restarting the server. A missing or unreadable
/// file is a server misconfiguration and becomes a 500, not a 404.
pub async fn get_download(State(state): State<DownloadState>) -> Response {
    let path = state.assets_dir.join(DOWNLOAD_FILE_NAME);

    let file_bytes = match tokio::fs::read(&path).await {
        Ok(bytes) => bytes,
        Err(error) => {
            tracing::error!("Could not read the download file {}: {error}", path.display());
            return render_internal_server_error();
        }
    };

    (
        [
            (header::CONTENT_TYPE, "application/pdf".to_owned()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{DOWNLOAD_FILE_NAME}\""),
            ),
        ],
        file_bytes,
    )
        .into_response()
}

#[cfg(test)]
mod download_tests {
    use axum::{Router, extract::State, http::StatusCode, routing::get};
    use axum_test::TestServer;

    use crate::endpoints;

    use super::{DOWNLOAD_FILE_NAME, DownloadState, get_download};

    #[tokio::test]
    async fn download_serves_file_as_attachment() {
        let assets_dir = std::env::temp_dir().join("members_only_download_test");
        std::fs::create_dir_all(&assets_dir).expect("Could not create temp assets dir");
        let want_bytes = b"%PDF-1.4 stub contents";
        std::fs::write(assets_dir.join(DOWNLOAD_FILE_NAME), want_bytes)
            .expect("Could not write test file");

        let app = Router::new()
            .route(endpoints::DOWNLOAD, get(get_download))
            .with_state(DownloadState { assets_dir });

        let server = TestServer::try_new(app).expect("Could not create test server.");

        let response = server.get(endpoints::DOWNLOAD).await;

        response.assert_status_ok();
        assert_eq!(response.header("content-type"), "application/pdf");
        assert_eq!(
            response.header("content-disposition").to_str().unwrap(),
            format!("attachment; filename=\"{DOWNLOAD_FILE_NAME}\"")
        );
        assert_eq!(response.as_bytes().as_ref(), &want_bytes[..]);
    }

    #[tokio::test]
    async fn download_returns_500_when_file_is_missing() {
        let state = DownloadState {
            assets_dir: std::env::temp_dir().join("members_only_no_such_dir"),
        };

        let response = get_download(State(state)).await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
