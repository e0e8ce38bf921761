//! Terminal and JSON rendering of a query result

use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};
use pricelens_core::{Query, QueryResult, RangeOutcome, RangeSummary, TrendChart};
use serde_json::{Value, json};

const SPARK_LEVELS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Columns used by the trend sparkline
pub const CHART_WIDTH: usize = 60;

/// Human-readable report
pub fn render_text(query: &Query, result: &QueryResult) -> String {
    let mut out = String::new();

    match &result.text_answer {
        Ok(answer) => {
            if answer.search_context_empty {
                out.push_str(&format!(
                    "⚠️  No search results were found for '{}'. The answer below is not \
                     grounded in live data.\n\n",
                    query.stock_name()
                ));
            }
            out.push_str("✅ Stock price retrieved successfully!\n\n");
            out.push_str("Result:\n\n");
            out.push_str(answer.content.trim_end());
            out.push('\n');
        }
        Err(e) => {
            out.push_str(&format!("❌ Error: {e}\n"));
        }
    }

    match &result.range_summary {
        RangeOutcome::NotRequested => {}
        RangeOutcome::NoData => {
            out.push_str(&format!(
                "\nNo price history available for {}.\n",
                query.symbol().unwrap_or("this symbol")
            ));
        }
        RangeOutcome::Ready(summary) => {
            out.push('\n');
            out.push_str(&range_table(summary).to_string());
            out.push_str("\n\n");
            out.push_str(&render_chart(&summary.trend_chart(), CHART_WIDTH));
        }
        RangeOutcome::Failed(e) => {
            out.push_str(&format!("\n❌ Price history unavailable: {e}\n"));
        }
    }

    out
}

fn range_table(summary: &RangeSummary) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Metric", "Value"]);

    table.add_row(vec!["52-Week High".to_string(), format!("{:.2}", summary.high)]);
    table.add_row(vec!["52-Week Low".to_string(), format!("{:.2}", summary.low)]);
    if let Some(close) = summary.latest_close() {
        table.add_row(vec!["Latest Close".to_string(), format!("{close:.2}")]);
    }
    table
}

/// Sparkline of the closes framed by the two reference lines
pub fn render_chart(chart: &TrendChart, width: usize) -> String {
    let [high, low] = &chart.reference_lines;
    let closes: Vec<f64> = chart.points.iter().map(|(_, close)| *close).collect();

    let mut out = String::new();
    if let (Some((first, _)), Some((last, _))) = (chart.points.first(), chart.points.last()) {
        out.push_str(&format!("Price trend {first} to {last}\n"));
    }
    out.push_str(&format!("{:>10.2} ┤ {}\n", high.value, high.label));
    out.push_str(&format!("{:>10} │{}\n", "", sparkline(&closes, low.value, high.value, width)));
    out.push_str(&format!("{:>10.2} ┤ {}\n", low.value, low.label));
    out
}

/// One block character per column, scaled between `low` and `high`
pub fn sparkline(values: &[f64], low: f64, high: f64, width: usize) -> String {
    if values.is_empty() || width == 0 {
        return String::new();
    }

    let span = high - low;
    let chunk = values.len().div_ceil(width);

    values
        .chunks(chunk)
        .map(|c| c.iter().sum::<f64>() / c.len() as f64)
        .map(|v| {
            if span <= 0.0 {
                return SPARK_LEVELS[(SPARK_LEVELS.len() - 1) / 2];
            }
            let scaled = ((v - low) / span * 7.0).round().clamp(0.0, 7.0);
            SPARK_LEVELS[scaled as usize]
        })
        .collect()
}

/// Machine-readable view of the same result
pub fn render_json(query: &Query, result: &QueryResult) -> Value {
    let text_answer = match &result.text_answer {
        Ok(answer) => json!({
            "status": "ok",
            "content": answer.content,
            "search_context_empty": answer.search_context_empty,
        }),
        Err(e) => json!({
            "status": "failed",
            "provider": e.provider(),
            "error": e.to_string(),
        }),
    };

    json!({
        "query_id": result.query_id.to_string(),
        "stock_name": query.stock_name(),
        "symbol": query.symbol(),
        "text_answer": text_answer,
        "range_summary": result.range_summary,
    })
}
