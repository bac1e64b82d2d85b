//! Report dispatch.
//!
//! The assembler hands a finished HTML body plus chart artifact paths to a
//! `Mailer`. The SMTP implementation inlines the charts as content-id
//! attachments and rewrites the body's file-path references to `cid:` URLs;
//! the file implementation writes the body to disk for inspection (and for
//! tests). Dispatch failures are per-tenant: the caller logs and moves on.

use std::path::{Path, PathBuf};

use lettre::message::header::ContentType;
use lettre::message::{Attachment, Body, Mailbox, MultiPart, SinglePart};
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("invalid mail address [{0}]")]
    Address(String),
    #[error("cannot read attachment {path}: {source}")]
    Attachment {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("message assembly failed: {0}")]
    Build(String),
    #[error("SMTP failure: {0}")]
    Transport(String),
    #[error("cannot write report file: {0}")]
    Write(std::io::Error),
}

/// A fully assembled, ready-to-send report email.
#[derive(Debug, Clone)]
pub struct OutgoingReport {
    pub to: String,
    pub cc: String,
    pub subject: String,
    pub html_body: String,
    /// Chart artifacts to inline; the body references them by path.
    pub inline_images: Vec<PathBuf>,
}

/// Dispatch seam. Production sends over SMTP; `smtp.enabled = false` and
/// tests use the file sink.
#[async_trait::async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, report: &OutgoingReport) -> Result<(), MailError>;
}

/// Content-id for an attachment: its file name with spaces underscored.
fn content_id(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().replace(' ', "_"))
        .unwrap_or_default()
}

/// Replace every image-path reference in the body with its `cid:` URL.
fn rewrite_cids(mut html: String, images: &[PathBuf]) -> String {
    for path in images {
        let cid = content_id(path);
        html = html.replace(&path.to_string_lossy().to_string(), &format!("cid:{cid}"));
    }
    html
}

// ── SMTP ─────────────────────────────────────────────

pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    /// Plain relay without TLS: the relay host is expected to be an
    /// internal submission agent, as with the typical port-25 setup.
    pub fn new(server: &str, port: u16, mail_from: &str) -> Result<Self, MailError> {
        let from = mail_from
            .parse::<Mailbox>()
            .map_err(|_| MailError::Address(mail_from.to_string()))?;
        let transport = AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(server)
            .port(port)
            .build();
        Ok(Self { transport, from })
    }
}

#[async_trait::async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, report: &OutgoingReport) -> Result<(), MailError> {
        let to = report
            .to
            .parse::<Mailbox>()
            .map_err(|_| MailError::Address(report.to.clone()))?;

        let mut builder = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(report.subject.clone());

        if !report.cc.is_empty() {
            let cc = report
                .cc
                .parse::<Mailbox>()
                .map_err(|_| MailError::Address(report.cc.clone()))?;
            builder = builder.cc(cc);
        }

        let html = rewrite_cids(report.html_body.clone(), &report.inline_images);

        let mut related = MultiPart::related().singlepart(
            SinglePart::builder()
                .header(ContentType::TEXT_HTML)
                .body(html),
        );

        for path in &report.inline_images {
            let bytes = std::fs::read(path).map_err(|source| MailError::Attachment {
                path: path.clone(),
                source,
            })?;
            let png = ContentType::parse("image/png")
                .map_err(|e| MailError::Build(e.to_string()))?;
            related = related.singlepart(
                Attachment::new_inline(content_id(path)).body(Body::new(bytes), png),
            );
        }

        let message = builder
            .multipart(related)
            .map_err(|e| MailError::Build(e.to_string()))?;

        self.transport
            .send(message)
            .await
            .map(|_| ())
            .map_err(|e| MailError::Transport(e.to_string()))
    }
}

// ── File sink ────────────────────────────────────────

/// Writes each report body as an HTML file instead of sending it.
pub struct FileMailer {
    out_dir: PathBuf,
}

impl FileMailer {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
        }
    }

    fn file_name(subject: &str) -> String {
        let safe: String = subject
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '-' { c } else { '_' })
            .collect();
        format!("{safe}.html")
    }
}

#[async_trait::async_trait]
impl Mailer for FileMailer {
    async fn send(&self, report: &OutgoingReport) -> Result<(), MailError> {
        std::fs::create_dir_all(&self.out_dir).map_err(MailError::Write)?;
        let path = self.out_dir.join(Self::file_name(&report.subject));
        let html = rewrite_cids(report.html_body.clone(), &report.inline_images);
        std::fs::write(&path, html).map_err(MailError::Write)?;
        tracing::info!(path = %path.display(), "report written to file");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_id_underscores_spaces() {
        let path = PathBuf::from("/tmp/images/acme/2026-03-01 report_Intune.png");
        assert_eq!(content_id(&path), "2026-03-01_report_Intune.png");
    }

    #[test]
    fn rewrite_replaces_paths_with_cids() {
        let path = PathBuf::from("/tmp/images/acme/chart_Intune.png");
        let html = format!("<img src=\"{}\">", path.display());
        let rewritten = rewrite_cids(html, &[path]);
        assert_eq!(rewritten, "<img src=\"cid:chart_Intune.png\">");
    }

    #[tokio::test]
    async fn file_mailer_writes_rewritten_body() {
        let dir = tempfile::TempDir::new().unwrap();
        let mailer = FileMailer::new(dir.path());
        let chart = dir.path().join("chart_Intune.png");
        let report = OutgoingReport {
            to: "ops@acme.example".to_string(),
            cc: String::new(),
            subject: "[acme] Service health report".to_string(),
            html_body: format!("<img src=\"{}\">", chart.display()),
            inline_images: vec![chart],
        };
        mailer.send(&report).await.unwrap();

        let written = dir.path().join("_acme__Service_health_report.html");
        let content = std::fs::read_to_string(written).unwrap();
        assert!(content.contains("cid:chart_Intune.png"));
    }
}
