// SPDX-FileCopyrightText: 2026 Traffika Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Paginated plain-text marketing summary.
//!
//! Combines the currently known offers with a freshly fetched
//! attribution summary into a page-broken document suitable for upload
//! as a chat document. Purely mechanical: all inputs arrive
//! pre-computed.

use chrono::NaiveDate;

use traffika_core::{DateRange, Offer};

/// Content lines per page, excluding the page header.
const LINES_PER_PAGE: usize = 24;

/// Aggregate figures for one fetched attribution report.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributionSummary {
    /// Human label of the report kind, e.g. "installs".
    pub report_label: String,
    pub range: DateRange,
    pub record_count: u64,
    /// Per-day record counts, ascending.
    pub daily: Vec<(NaiveDate, u64)>,
}

/// A marketing summary document builder.
#[derive(Debug, Clone)]
pub struct SummaryReport {
    offers: Vec<Offer>,
    attribution: Option<AttributionSummary>,
}

impl SummaryReport {
    pub fn new(offers: Vec<Offer>, attribution: Option<AttributionSummary>) -> Self {
        Self {
            offers,
            attribution,
        }
    }

    fn lines(&self) -> Vec<String> {
        let mut lines = vec!["MARKETING REPORT".to_string(), String::new()];

        if self.offers.is_empty() {
            lines.push("No active offers.".to_string());
        } else {
            lines.push("Active offers:".to_string());
            for offer in &self.offers {
                lines.push(format!("- {} (payout ${})", offer.name, offer.payout));
                lines.push(format!("    KPI: {}", offer.kpi));
            }
        }

        if let Some(summary) = &self.attribution {
            lines.push(String::new());
            lines.push(format!(
                "Attribution report: {} for {}",
                summary.report_label, summary.range
            ));
            lines.push(format!("Records: {}", summary.record_count));
            for (date, count) in &summary.daily {
                lines.push(format!("    {date}: {count}"));
            }
        }

        lines
    }

    /// Render the document as page-broken text bytes.
    ///
    /// Every page starts with a `--- page i/n ---` header followed by up
    /// to [`LINES_PER_PAGE`] content lines.
    pub fn render(&self) -> Vec<u8> {
        let lines = self.lines();
        let page_count = lines.len().div_ceil(LINES_PER_PAGE).max(1);

        let mut out = String::new();
        for (page_idx, chunk) in lines.chunks(LINES_PER_PAGE).enumerate() {
            out.push_str(&format!("--- page {}/{} ---\n", page_idx + 1, page_count));
            for line in chunk {
                out.push_str(line);
                out.push('\n');
            }
            out.push('\n');
        }
        if lines.is_empty() {
            out.push_str("--- page 1/1 ---\n");
        }
        out.into_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn make_offer(id: i64, name: &str) -> Offer {
        Offer {
            id,
            name: name.to_string(),
            description: "desc".to_string(),
            payout: 2.5,
            geo: "US".to_string(),
            vertical: "Games".to_string(),
            kpi: "retention".to_string(),
            tracker: "appsflyer".to_string(),
            antifraud: "protect360".to_string(),
            created_at: "2026-01-01T00:00:00Z".to_string(),
            attribution_app_id: Some("com.x".to_string()),
            attribution_event: Some("purchase".to_string()),
            daily_limit: Some(100),
        }
    }

    fn render_string(report: &SummaryReport) -> String {
        String::from_utf8(report.render()).unwrap()
    }

    #[test]
    fn single_page_report_lists_offers_and_stats() {
        let summary = AttributionSummary {
            report_label: "installs".to_string(),
            range: DateRange::new(date("2024-01-01"), date("2024-01-07")).unwrap(),
            record_count: 42,
            daily: vec![(date("2024-01-01"), 40), (date("2024-01-03"), 2)],
        };
        let report = SummaryReport::new(vec![make_offer(1, "Dragon Saga")], Some(summary));
        let text = render_string(&report);

        assert!(text.starts_with("--- page 1/1 ---"));
        assert!(text.contains("Dragon Saga (payout $2.5)"));
        assert!(text.contains("KPI: retention"));
        assert!(text.contains("Records: 42"));
        assert!(text.contains("2024-01-01: 40"));
    }

    #[test]
    fn empty_report_still_produces_one_page() {
        let report = SummaryReport::new(Vec::new(), None);
        let text = render_string(&report);
        assert!(text.contains("--- page 1/1 ---"));
        assert!(text.contains("No active offers."));
    }

    #[test]
    fn long_report_paginates_at_fixed_page_length() {
        // 3 header lines + 2 lines per offer: 20 offers -> 43 lines -> 2 pages.
        let offers: Vec<Offer> = (0..20)
            .map(|i| make_offer(i, &format!("Offer {i}")))
            .collect();
        let report = SummaryReport::new(offers, None);
        let text = render_string(&report);

        assert!(text.contains("--- page 1/2 ---"));
        assert!(text.contains("--- page 2/2 ---"));
        assert!(!text.contains("--- page 3/"));

        // No page carries more than LINES_PER_PAGE content lines.
        for page in text.split("--- page ").skip(1) {
            let content_lines = page
                .lines()
                .skip(1) // remainder of the page header line
                .filter(|l| !l.is_empty())
                .count();
            assert!(content_lines <= LINES_PER_PAGE, "page too long: {content_lines}");
        }
    }
}
