use eyre::Result;

use crate::Report;

/// Render summaries as a plain numbered list
pub fn render_text(report: &Report) -> String {
    report
        .summaries
        .iter()
        .map(|s| s.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render summaries as markdown key points under the video title
pub fn render_markdown(report: &Report) -> String {
    let title = if report.title.is_empty() {
        report.video_id.to_string()
    } else {
        report.title.clone()
    };

    let mut out = format!("## {title}\n\n");
    if let Some(ref from) = report.translated_from {
        out.push_str(&format!("_Translated from '{from}' captions._\n\n"));
    } else if report.is_generated {
        out.push_str("_Auto-generated captions._\n\n");
    }
    for s in &report.summaries {
        out.push_str(&format!("**{}.** {}\n", s.index, s.text));
    }
    out
}

/// Render the full report as pretty-printed JSON
pub fn render_json(report: &Report) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{SummaryLine, extract_video_id};

    fn sample_report() -> Report {
        Report {
            video_id: extract_video_id("https://youtu.be/dQw4w9WgXcQ").unwrap(),
            title: "Test Video".to_string(),
            language: "en".to_string(),
            is_generated: false,
            translated_from: None,
            summaries: vec![
                SummaryLine {
                    index: 1,
                    text: "Hello world".to_string(),
                },
                SummaryLine {
                    index: 2,
                    text: "This is a test".to_string(),
                },
            ],
        }
    }

    #[test]
    fn test_render_text() {
        assert_eq!(render_text(&sample_report()), "1. Hello world\n2. This is a test");
    }

    #[test]
    fn test_render_text_empty() {
        let report = Report {
            summaries: vec![],
            ..sample_report()
        };
        assert_eq!(render_text(&report), "");
    }

    #[test]
    fn test_render_markdown() {
        let output = render_markdown(&sample_report());
        assert_eq!(output, "## Test Video\n\n**1.** Hello world\n**2.** This is a test\n");
    }

    #[test]
    fn test_render_markdown_translated_without_title() {
        let report = Report {
            title: String::new(),
            translated_from: Some("de".to_string()),
            ..sample_report()
        };
        let output = render_markdown(&report);
        assert!(output.starts_with("## dQw4w9WgXcQ\n\n_Translated from 'de' captions._\n\n"));
    }

    #[test]
    fn test_render_markdown_auto_generated() {
        let report = Report {
            is_generated: true,
            ..sample_report()
        };
        let output = render_markdown(&report);
        assert_eq!(
            output,
            "## Test Video\n\n_Auto-generated captions._\n\n**1.** Hello world\n**2.** This is a test\n"
        );
    }

    #[test]
    fn test_render_json() {
        let json: serde_json::Value = serde_json::from_str(&render_json(&sample_report()).unwrap()).unwrap();
        assert_eq!(json["video_id"], "dQw4w9WgXcQ");
        assert_eq!(json["summaries"][1]["index"], 2);
        assert_eq!(json["summaries"][1]["text"], "This is a test");
        assert!(json["translated_from"].is_null());
        assert_eq!(json["is_generated"], false);
    }
}
