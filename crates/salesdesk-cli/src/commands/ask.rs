//! Single question command and terminal rendering of replies

use std::fmt::Write as _;

use anyhow::Result;
use salesdesk_core::{Assistant, AssistantReply, ChartSpec};

/// Width of the longest bar in the terminal chart
const BAR_WIDTH: usize = 30;

/// Answer one question and print the reply
pub async fn cmd_ask(assistant: &Assistant, question: &str, json: bool) -> Result<()> {
    let reply = assistant.ask(question).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&reply)?);
    } else {
        print!("{}", render_reply(&reply));
    }

    Ok(())
}

/// Render a reply the way the dashboard lays it out, top to bottom
pub fn render_reply(reply: &AssistantReply) -> String {
    let mut out = String::new();

    if let Some(raw) = &reply.raw_intent {
        let _ = writeln!(out, "🧠 Extracted intent:");
        let _ = writeln!(out, "   {}", raw.trim());
        let _ = writeln!(out);
    }

    if let Some(summary) = &reply.summary {
        let _ = writeln!(out, "📊 Data:");
        let entries = summary.entries();
        let width = entries.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
        for (key, value) in entries {
            let _ = writeln!(out, "   {:<width$}  {}", key, value, width = width);
        }
        let _ = writeln!(out);
    }

    if let Some(chart) = &reply.chart {
        out.push_str(&render_chart(chart));
        let _ = writeln!(out);
    }

    if let Some(insights) = &reply.insights {
        let _ = writeln!(out, "💡 AI insights:");
        for line in insights.lines() {
            let _ = writeln!(out, "   {}", line);
        }
        let _ = writeln!(out);
    }

    if let Some(error) = &reply.error {
        let _ = writeln!(out, "❌ {}", error.message);
    }

    out
}

/// Horizontal bar chart with one row per label
pub fn render_chart(chart: &ChartSpec) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "📈 {} by {}:", chart.y_label, chart.x_label);

    let max = chart.values.iter().copied().max().unwrap_or(0).max(1);
    let label_width = chart.labels.iter().map(|l| l.len()).max().unwrap_or(0);

    for (label, &value) in chart.labels.iter().zip(&chart.values) {
        let len = (value as f64 / max as f64 * BAR_WIDTH as f64).round() as usize;
        let _ = writeln!(
            out,
            "   {:<width$}  {:<bar$}  {}",
            label,
            "█".repeat(len),
            value,
            width = label_width,
            bar = BAR_WIDTH
        );
    }

    out
}
