//! Markdown报告转样式化文档

use std::path::{Path, PathBuf};

use tokio::process::Command;
use tracing::debug;

use super::file_stem;
use crate::error::RenderError;

const STYLE: &str = r#"
body { font-family: "Helvetica Neue", Arial, sans-serif; color: #222; max-width: 820px; margin: 40px auto; line-height: 1.55; }
h1, h2, h3 { color: #1a3c6e; }
h1 { border-bottom: 2px solid #1a3c6e; padding-bottom: 6px; }
table { border-collapse: collapse; width: 100%; }
th, td { border: 1px solid #ccc; padding: 6px 10px; text-align: left; }
code { background: #f4f4f4; padding: 1px 4px; border-radius: 3px; }
"#;

/// 文档渲染器
///
/// 先把Markdown渲染为独立HTML页面，再交给外部HTML转PDF程序；
/// 未配置转换程序时HTML即为最终文档。
#[derive(Debug, Clone)]
pub struct DocumentRenderer {
    pdf_engine: Option<String>,
}

impl DocumentRenderer {
    pub fn new(pdf_engine: &str) -> Self {
        let pdf_engine = Some(pdf_engine.trim())
            .filter(|engine| !engine.is_empty())
            .map(str::to_string);
        Self { pdf_engine }
    }

    /// 渲染 `{company}_report.pdf`（或 `.html`），返回文档路径
    pub async fn render(
        &self,
        markdown_text: &str,
        company_name: &str,
        output_dir: &Path,
    ) -> Result<PathBuf, RenderError> {
        tokio::fs::create_dir_all(output_dir)
            .await
            .map_err(|source| RenderError::Io {
                path: output_dir.to_path_buf(),
                source,
            })?;

        let stem = format!("{}_report", file_stem(company_name));
        let html_path = output_dir.join(format!("{}.html", stem));
        let html = render_html(markdown_text, &format!("{} Company Report", company_name));
        tokio::fs::write(&html_path, html)
            .await
            .map_err(|source| RenderError::Io {
                path: html_path.clone(),
                source,
            })?;

        let Some(engine) = &self.pdf_engine else {
            return Ok(html_path);
        };

        let pdf_path = output_dir.join(format!("{}.pdf", stem));
        debug!(engine = %engine, pdf = %pdf_path.display(), "converting report to pdf");
        let output = Command::new(engine)
            .arg("--quiet")
            .arg(&html_path)
            .arg(&pdf_path)
            .output()
            .await
            .map_err(|source| RenderError::EngineUnavailable {
                engine: engine.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(RenderError::EngineFailed {
                engine: engine.clone(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(pdf_path)
    }
}

/// Markdown转为带样式的独立HTML页面
pub fn render_html(markdown_text: &str, title: &str) -> String {
    let body = markdown::to_html(markdown_text);
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n<style>{}</style>\n</head>\n<body>\n{}\n</body>\n</html>\n",
        escape_html(title),
        STYLE,
        body
    )
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
