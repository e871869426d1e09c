//! Document metadata rules.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::json;
use veritas_core::errors::VeritasResult;
use veritas_core::models::Severity;

use super::{Finding, Rule};
use crate::context::RuleContext;

/// Design tools and receipt generators that produce documents from templates.
static TEMPLATE_TOOLS: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:canva|adobe express|receipt ?maker|receipt generator|makereceipt|receiptfaker|fake receipt|invoice generator|invoicehome|invoice simple|template\.net|expensure)\b",
    )
    .ok()
});

/// Raster image editors.
static IMAGE_EDITORS: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:photoshop|gimp|affinity photo|pixelmator|paint\.net|photopea|paintshop|lightroom|snapseed|picsart)\b",
    )
    .ok()
});

/// Upstream flags that indicate the content itself was altered.
const TAMPER_FLAGS: &[&str] = &[
    "edited",
    "multiple_fonts",
    "font_mismatch",
    "cloned_region",
    "layer_mismatch",
    "text_overlay",
    "digitally_altered",
    "incremental_update",
];

/// Upstream flags that indicate a second-hand capture of the document.
const CAPTURE_FLAGS: &[&str] = &["screenshot", "recaptured", "screen_photo", "low_resolution"];

/// First (tool, matched text) pair where a metadata tool name matches `pattern`
/// on word boundaries.
fn match_tool(ctx: &RuleContext<'_>, pattern: &LazyLock<Option<Regex>>) -> Option<(String, String)> {
    let re = pattern.as_ref()?;
    ctx.features.metadata.tool_names().find_map(|tool| {
        let matched = re.find(&tool)?.as_str().to_string();
        Some((tool, matched))
    })
}

/// Upstream flags found in `table`, normalized to `snake_case`, in input order.
fn match_flags(ctx: &RuleContext<'_>, table: &[&str]) -> Vec<String> {
    let mut found: Vec<String> = Vec::new();
    for flag in &ctx.features.metadata.flags {
        let flag = flag.trim().to_lowercase().replace([' ', '-'], "_");
        if table.contains(&flag.as_str()) && !found.contains(&flag) {
            found.push(flag);
        }
    }
    found
}

/// The document was produced by a template or design tool.
pub struct TemplateTool;

impl Rule for TemplateTool {
    fn id(&self) -> &'static str {
        "metadata.template_tool"
    }

    fn code(&self) -> &'static str {
        "META_TEMPLATE_TOOL"
    }

    fn severity(&self) -> Severity {
        Severity::HardFail
    }

    fn contribution(&self) -> f64 {
        0.60
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> VeritasResult<Option<Finding>> {
        Ok(match_tool(ctx, &TEMPLATE_TOOLS).map(|(tool, keyword)| {
            Finding::new(
                format!("document produced by template tool '{tool}'"),
                json!({ "tool": tool, "matched": keyword }),
            )
        }))
    }
}

/// The document passed through an image editor.
pub struct ImageEditor;

impl Rule for ImageEditor {
    fn id(&self) -> &'static str {
        "metadata.image_editor"
    }

    fn code(&self) -> &'static str {
        "META_IMAGE_EDITOR"
    }

    fn severity(&self) -> Severity {
        Severity::Critical
    }

    fn contribution(&self) -> f64 {
        0.25
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> VeritasResult<Option<Finding>> {
        Ok(match_tool(ctx, &IMAGE_EDITORS).map(|(tool, keyword)| {
            Finding::new(
                format!("document edited with image editor '{tool}'"),
                json!({ "tool": tool, "matched": keyword }),
            )
        }))
    }
}

/// Modification timestamp later than creation beyond the grace window.
pub struct ModifiedAfterCreation;

impl Rule for ModifiedAfterCreation {
    fn id(&self) -> &'static str {
        "metadata.modified_after_creation"
    }

    fn code(&self) -> &'static str {
        "META_MODIFIED_AFTER_CREATION"
    }

    fn severity(&self) -> Severity {
        Severity::Critical
    }

    fn contribution(&self) -> f64 {
        0.15
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> VeritasResult<Option<Finding>> {
        let meta = &ctx.features.metadata;
        let (Some(created), Some(modified)) = (meta.created_at, meta.modified_at) else {
            return Ok(None);
        };
        let gap = modified - created;
        if gap <= chrono::Duration::minutes(ctx.config.metadata_grace_minutes) {
            return Ok(None);
        }
        Ok(Some(Finding::new(
            format!("modified {} minutes after creation", gap.num_minutes()),
            json!({
                "created_at": created.to_rfc3339(),
                "modified_at": modified.to_rfc3339(),
                "gap_minutes": gap.num_minutes(),
                "grace_minutes": ctx.config.metadata_grace_minutes,
            }),
        )))
    }
}

/// Upstream flags that the content was altered.
pub struct TamperFlags;

impl Rule for TamperFlags {
    fn id(&self) -> &'static str {
        "metadata.tamper_flags"
    }

    fn code(&self) -> &'static str {
        "META_TAMPER_FLAGS"
    }

    fn severity(&self) -> Severity {
        Severity::Critical
    }

    fn contribution(&self) -> f64 {
        0.20
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> VeritasResult<Option<Finding>> {
        let flags = match_flags(ctx, TAMPER_FLAGS);
        if flags.is_empty() {
            return Ok(None);
        }
        Ok(Some(Finding::new(
            format!("upstream tamper flags: {}", flags.join(", ")),
            json!({ "flags": flags, "reported": ctx.features.metadata.flags }),
        )))
    }
}

/// Upstream flags that the document is a screenshot or re-capture.
pub struct CaptureFlags;

impl Rule for CaptureFlags {
    fn id(&self) -> &'static str {
        "metadata.capture_flags"
    }

    fn code(&self) -> &'static str {
        "META_CAPTURE_FLAGS"
    }

    fn severity(&self) -> Severity {
        Severity::Info
    }

    fn contribution(&self) -> f64 {
        0.05
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> VeritasResult<Option<Finding>> {
        let flags = match_flags(ctx, CAPTURE_FLAGS);
        if flags.is_empty() {
            return Ok(None);
        }
        Ok(Some(Finding::new(
            format!("document is a second-hand capture ({})", flags.join(", ")),
            json!({ "flags": flags, "reported": ctx.features.metadata.flags }),
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::test_support::{features, received_at, with_ctx};

    #[test]
    fn canva_producer_hard_fails() {
        let mut f = features();
        f.metadata.producer = Some("Canva".to_string());
        let finding = with_ctx(&f, |ctx| TemplateTool.evaluate(ctx)).unwrap();
        assert!(finding.is_some());
        assert_eq!(finding.unwrap().evidence["matched"], "canva");
    }

    #[test]
    fn photoshop_is_an_editor_not_a_template() {
        let mut f = features();
        f.metadata.creator_tool = Some("Adobe Photoshop 25.1 (Windows)".to_string());
        assert!(with_ctx(&f, |ctx| TemplateTool.evaluate(ctx)).unwrap().is_none());
        assert!(with_ctx(&f, |ctx| ImageEditor.evaluate(ctx)).unwrap().is_some());
    }

    #[test]
    fn canvas_exporter_is_not_a_template_tool() {
        let mut f = features();
        f.metadata.producer = Some("Canvas PDF Export".to_string());
        assert!(with_ctx(&f, |ctx| TemplateTool.evaluate(ctx)).unwrap().is_none());
        f.metadata.creator_tool = Some("Made with Canva".to_string());
        let finding = with_ctx(&f, |ctx| TemplateTool.evaluate(ctx)).unwrap().unwrap();
        assert_eq!(finding.evidence["tool"], "made with canva");
    }

    #[test]
    fn editor_names_inside_other_words_do_not_match() {
        let mut f = features();
        f.metadata.creator_tool = Some("Gimple Scanner 2".to_string());
        assert!(with_ctx(&f, |ctx| ImageEditor.evaluate(ctx)).unwrap().is_none());
    }

    #[test]
    fn upstream_flags_split_into_tamper_and_capture() {
        let mut f = features();
        f.metadata.flags = vec![
            "Screenshot".to_string(),
            "multiple-fonts".to_string(),
            "edited".to_string(),
            "edited".to_string(),
            "blurry".to_string(),
        ];
        let tamper = with_ctx(&f, |ctx| TamperFlags.evaluate(ctx)).unwrap().unwrap();
        assert_eq!(tamper.evidence["flags"], json!(["multiple_fonts", "edited"]));
        let capture = with_ctx(&f, |ctx| CaptureFlags.evaluate(ctx)).unwrap().unwrap();
        assert_eq!(capture.evidence["flags"], json!(["screenshot"]));
    }

    #[test]
    fn unknown_flags_are_ignored() {
        let mut f = features();
        f.metadata.flags = vec!["blurry".to_string(), "rotated".to_string()];
        assert!(with_ctx(&f, |ctx| TamperFlags.evaluate(ctx)).unwrap().is_none());
        assert!(with_ctx(&f, |ctx| CaptureFlags.evaluate(ctx)).unwrap().is_none());
    }

    #[test]
    fn modification_inside_grace_window_ignored() {
        let mut f = features();
        f.metadata.created_at = Some(received_at());
        f.metadata.modified_at = Some(received_at() + chrono::Duration::minutes(10));
        assert!(with_ctx(&f, |ctx| ModifiedAfterCreation.evaluate(ctx)).unwrap().is_none());
        f.metadata.modified_at = Some(received_at() + chrono::Duration::minutes(11));
        assert!(with_ctx(&f, |ctx| ModifiedAfterCreation.evaluate(ctx)).unwrap().is_some());
    }
}
