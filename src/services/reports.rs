//! Report downloads: the backend renders PDF/XLSX, the client only streams
//! bytes to disk under a filename carrying the requested date range.

use crate::api::Api;
use crate::cli::ReportArgs;
use std::path::PathBuf;

pub fn report_filename(kind: &str, from: &str, to: &str, ext: &str) -> String {
    format!("{kind}_{from}_{to}.{ext}")
}

#[derive(serde::Serialize)]
pub struct DownloadedReport {
    pub path: String,
    pub bytes: usize,
}

pub fn download(api: &Api, kind: &str, args: &ReportArgs) -> anyhow::Result<DownloadedReport> {
    let bytes = api.download_report(kind, &args.from, &args.to, args.format)?;
    let path = match &args.out {
        Some(p) => p.clone(),
        None => PathBuf::from(report_filename(
            kind,
            &args.from,
            &args.to,
            args.format.extension(),
        )),
    };
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(&path, &bytes)?;
    log::info!("wrote {} bytes to {}", bytes.len(), path.display());
    Ok(DownloadedReport {
        path: path.to_string_lossy().to_string(),
        bytes: bytes.len(),
    })
}
