// SPDX-FileCopyrightText: 2026 Traffika Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Executes completed analysis and report requests: fetch raw reports,
//! run the pipeline, and package the artifact for delivery.

use tracing::info;

use traffika_analytics::{chart, conversion_rate, forecast, trend, RawDataset};
use traffika_attribution::{
    post_attribution_extra_fields, AttributionClient, RawReportKind, ReportQuery,
};
use traffika_core::{
    AnalysisKind, AnalysisRequest, EntityStore, ExtraFields, Offer, ReportKind, ReportRequest,
    TraffikaError,
};
use traffika_report::{AttributionSummary, SummaryReport};

use crate::handler::Outbound;

async fn load_offer(store: &dyn EntityStore, id: i64) -> Result<Offer, TraffikaError> {
    store
        .get_offer(id)
        .await?
        .ok_or(TraffikaError::NotFound { entity: "offer", id })
}

/// The attribution identifiers an offer must carry before analytics run.
fn require_attribution(offer: &Offer) -> Result<(String, String), TraffikaError> {
    offer
        .attribution_ids()
        .map(|(app, event)| (app.to_string(), event.to_string()))
        .ok_or_else(|| {
            TraffikaError::InsufficientData(format!(
                "offer \"{}\" is missing its attribution app ID or event name",
                offer.name
            ))
        })
}

/// Run one analysis request end-to-end and return the chart photo.
pub async fn run_analysis(
    store: &dyn EntityStore,
    client: &AttributionClient,
    request: &AnalysisRequest,
) -> Result<Outbound, TraffikaError> {
    let offer = load_offer(store, request.offer_id).await?;
    let (app_id, event_name) = require_attribution(&offer)?;

    let base_query = ReportQuery {
        app_id,
        range: request.range,
        event_name: None,
        media_source: request.media_source.clone(),
        additional_fields: None,
    };

    let png = match request.kind {
        AnalysisKind::Conversion => {
            let installs_raw = client
                .fetch_raw(RawReportKind::Installs, &base_query)
                .await?;
            let mut events_query = base_query.clone();
            events_query.event_name = Some(event_name);
            let events_raw = client
                .fetch_raw(RawReportKind::InAppEvents, &events_query)
                .await?;

            let summary = conversion_rate(
                &RawDataset::parse(&installs_raw),
                &RawDataset::parse(&events_raw),
            );
            info!(rate = summary.rate, "conversion analysis computed");
            chart::conversion_chart(&summary)?
        }
        AnalysisKind::Forecast => {
            let mut events_query = base_query.clone();
            events_query.event_name = Some(event_name);
            let events_raw = client
                .fetch_raw(RawReportKind::InAppEvents, &events_query)
                .await?;

            let series = forecast(&RawDataset::parse(&events_raw), offer.payout, request.range)?;
            chart::forecast_chart(&series)?
        }
        AnalysisKind::Trend => {
            let installs_raw = client
                .fetch_raw(RawReportKind::Installs, &base_query)
                .await?;

            let series = trend(&RawDataset::parse(&installs_raw))?;
            chart::trend_chart(&series)?
        }
    };

    let source_info = request
        .media_source
        .as_deref()
        .map(|s| format!("Source: {s}"))
        .unwrap_or_else(|| "All sources".to_string());

    Ok(Outbound::Photo {
        bytes: png,
        caption: format!(
            "Analysis result ({})\nOffer: {}\n{}\nPeriod: {}",
            request.kind, offer.name, source_info, request.range
        ),
    })
}

/// Run one report request: raw CSV pass-through for the attribution
/// kinds, or the rendered marketing summary.
pub async fn run_report(
    store: &dyn EntityStore,
    client: &AttributionClient,
    request: &ReportRequest,
) -> Result<Outbound, TraffikaError> {
    let offer = load_offer(store, request.offer_id).await?;
    let (app_id, offer_event) = require_attribution(&offer)?;

    let additional_fields = match &request.extra_fields {
        ExtraFields::Default => None,
        ExtraFields::All => Some(post_attribution_extra_fields().join(",")),
        ExtraFields::Custom(fields) => Some(fields.clone()),
    };

    let query = ReportQuery {
        app_id,
        range: request.range,
        event_name: None,
        media_source: None,
        additional_fields,
    };

    let (kind, query) = match request.kind {
        ReportKind::Installs => (RawReportKind::Installs, query),
        ReportKind::Events => {
            let mut query = query;
            query.event_name = Some(
                request
                    .event_name
                    .clone()
                    .unwrap_or(offer_event),
            );
            (RawReportKind::InAppEvents, query)
        }
        ReportKind::PostAttribution => {
            let mut query = query;
            // Fraud reports always carry the full extra-column set.
            query.additional_fields =
                Some(post_attribution_extra_fields().join(","));
            (RawReportKind::PostAttribution, query)
        }
        ReportKind::Summary => {
            let installs_raw = client.fetch_raw(RawReportKind::Installs, &query).await?;
            let dataset = RawDataset::parse(&installs_raw);
            let summary = AttributionSummary {
                report_label: "installs".to_string(),
                range: request.range,
                record_count: dataset.record_count(),
                daily: dataset
                    .bucket_by_date(traffika_analytics::INSTALL_TIME_COLUMN)
                    .into_iter()
                    .collect(),
            };
            let offers = store.list_offers().await?;
            let document = SummaryReport::new(offers, Some(summary)).render();
            return Ok(Outbound::Document {
                bytes: document,
                filename: format!("summary_{}_{}.txt", request.range.from, request.range.to),
                caption: format!("Marketing summary\nPeriod: {}", request.range),
            });
        }
    };

    let raw = client.fetch_raw(kind, &query).await?;
    if raw.is_empty() {
        return Err(TraffikaError::InsufficientData(format!(
            "no data for period {}",
            request.range
        )));
    }

    Ok(Outbound::Document {
        bytes: raw,
        filename: format!(
            "{}_{}_to_{}.csv",
            request.kind, request.range.from, request.range.to
        ),
        caption: format!("Report for: {}\nType: {}", offer.name, request.kind),
    })
}
