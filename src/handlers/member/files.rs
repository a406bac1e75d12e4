use axum::extract::Extension;

use crate::access::RequestContext;
use crate::middleware::response::{ApiResponse, ApiResult};
use crate::services::drive::{DriveClient, DriveFile};

/// GET /api/files - shared files in the current season's drive folder
pub async fn list(Extension(ctx): Extension<RequestContext>) -> ApiResult<Vec<DriveFile>> {
    let files = DriveClient::from_config().list_files(ctx.season.id).await?;
    Ok(ApiResponse::success(files))
}
