//! Export step: renders a draft to an HTML file and records its location.

use std::path::Path;

use chrono::Utc;
use tracing::debug;

use autodraft_export::render_document;
use autodraft_shared::{AutodraftError, Draft, Result};
use autodraft_storage::DraftRepo;

/// Render `draft` to `<export_dir>/<draft_id>.html` and persist the location.
///
/// The export directory is created if absent. The draft's status is left
/// untouched — routing happened at the quality gate. Write failures
/// propagate uncaught.
pub async fn export_draft_html(
    drafts: &dyn DraftRepo,
    export_dir: &Path,
    mut draft: Draft,
) -> Result<Draft> {
    std::fs::create_dir_all(export_dir).map_err(|e| AutodraftError::io(export_dir, e))?;

    let path = export_dir.join(format!("{}.html", draft.id));
    let html = render_document(&draft.title, &draft.content_md);
    std::fs::write(&path, html).map_err(|e| AutodraftError::io(&path, e))?;

    draft.export_html_ref = path.to_string_lossy().into_owned();
    draft.updated_at = Utc::now();
    drafts.save_draft(&draft).await?;

    debug!(draft_id = %draft.id, path = %path.display(), "draft exported");
    Ok(draft)
}
