// SPDX-FileCopyrightText: 2026 Traffika Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Message texts and list keyboards.

use traffika_core::{Offer, Role, TraffikaError, TrafficSource};

/// The /help text.
pub fn help_text() -> String {
    "Available commands:\n\
     /start - start working with the bot\n\
     /help - this help\n\
     /offers - list offers\n\
     /sources - list traffic sources\n\
     /analyze - analytics and forecasting\n\
     /cancel - cancel the current operation\n\
     \n\
     Admin commands:\n\
     /addoffer - add a new offer\n\
     /addsource - add a new traffic source\n\
     /report - generate a report\n\
     /grant_admin @user - grant admin rights"
        .to_string()
}

/// Greeting for /start.
pub fn greeting(first_name: &str) -> String {
    format!(
        "Hello {first_name}! I manage partner campaigns, offers, and performance analytics.\n\
         Type /help to see all available commands."
    )
}

/// Offer list keyboard: view for everyone, edit/delete for admins.
pub fn offers_keyboard(offers: &[Offer], role: Role) -> Vec<Vec<(String, String)>> {
    offers
        .iter()
        .map(|offer| {
            let label = format!("{} (${})", offer.name, offer.payout);
            let mut row = vec![(label, format!("offer_view_{}", offer.id))];
            if role == Role::Admin {
                row.push(("Edit".to_string(), format!("offer_edit_{}", offer.id)));
                row.push(("Delete".to_string(), format!("offer_delete_{}", offer.id)));
            }
            row
        })
        .collect()
}

/// Source list keyboard, same shape as the offer list.
pub fn sources_keyboard(sources: &[TrafficSource], role: Role) -> Vec<Vec<(String, String)>> {
    sources
        .iter()
        .map(|source| {
            let label = format!("{} ({}%)", source.name, source.conversion);
            let mut row = vec![(label, format!("source_view_{}", source.id))];
            if role == Role::Admin {
                row.push(("Edit".to_string(), format!("source_edit_{}", source.id)));
                row.push(("Delete".to_string(), format!("source_delete_{}", source.id)));
            }
            row
        })
        .collect()
}

/// Full offer card for the view callback.
pub fn offer_details(offer: &Offer) -> String {
    let mut text = format!(
        "{}\n\
         Payout: ${}\n\
         GEO: {}\n\
         Vertical: {}\n\
         KPI: {}\n\
         Tracker: {}\n\
         Anti-fraud: {}",
        offer.name,
        offer.payout,
        offer.geo,
        offer.vertical,
        offer.kpi,
        offer.tracker,
        offer.antifraud,
    );
    if let Some(event) = &offer.attribution_event {
        text.push_str(&format!("\nEvent: {event}"));
    }
    if let Some(limit) = offer.daily_limit {
        text.push_str(&format!("\nDaily limit: {limit}"));
    }
    text
}

/// Full source card for the view callback.
pub fn source_details(source: &TrafficSource) -> String {
    format!(
        "{}\n\
         Conversion: {}%\n\
         Cost: ${}\n\
         Capacity: {}\n\
         GEO: {}\n\
         Performance: {}",
        source.name,
        source.conversion,
        source.cost,
        source.capacity,
        source.geo,
        source.performance,
    )
}

/// User-facing rendering of the error taxonomy.
pub fn error_message(err: &TraffikaError) -> String {
    match err {
        TraffikaError::Validation(msg) => msg.clone(),
        TraffikaError::Authorization => {
            "You don't have permission to perform this action.".to_string()
        }
        TraffikaError::NotFound { entity, id } => format!("{entity} {id} not found."),
        TraffikaError::InsufficientData(msg) => msg.clone(),
        TraffikaError::Upstream { .. } => {
            "Failed to fetch data from the attribution service.".to_string()
        }
        _ => "Something went wrong. Try again later.".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_offer() -> Offer {
        Offer {
            id: 7,
            name: "Dragon Saga".to_string(),
            description: "desc".to_string(),
            payout: 2.5,
            geo: "US".to_string(),
            vertical: "Games".to_string(),
            kpi: "ret d7".to_string(),
            tracker: "appsflyer".to_string(),
            antifraud: "protect360".to_string(),
            created_at: "2026-01-01T00:00:00Z".to_string(),
            attribution_app_id: Some("com.x".to_string()),
            attribution_event: Some("purchase".to_string()),
            daily_limit: Some(100),
        }
    }

    #[test]
    fn admins_see_edit_and_delete_buttons() {
        let rows = offers_keyboard(&[make_offer()], Role::Admin);
        assert_eq!(rows.len(), 1);
        let data: Vec<&str> = rows[0].iter().map(|(_, d)| d.as_str()).collect();
        assert_eq!(data, ["offer_view_7", "offer_edit_7", "offer_delete_7"]);
    }

    #[test]
    fn partners_only_see_the_view_button() {
        let rows = offers_keyboard(&[make_offer()], Role::Partner);
        assert_eq!(rows[0].len(), 1);
        assert_eq!(rows[0][0].1, "offer_view_7");
    }

    #[test]
    fn offer_details_include_event_and_limit() {
        let text = offer_details(&make_offer());
        assert!(text.contains("Event: purchase"));
        assert!(text.contains("Daily limit: 100"));
    }

    #[test]
    fn upstream_errors_render_generically() {
        let err = TraffikaError::Upstream {
            message: "secret internals".to_string(),
            source: None,
        };
        let msg = error_message(&err);
        assert!(!msg.contains("secret internals"));
    }
}
