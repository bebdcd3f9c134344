use std::fmt::Write;

use reports_core::{AppViewModel, DownloadState, ModalView, ReportStatus, ResultCardView};

/// Renders the whole screen as plain text.
pub fn render(view: &AppViewModel) -> String {
    let mut out = String::new();
    render_session(&mut out, view);
    if view.signed_in_as.is_some() {
        render_tenants(&mut out, view);
    }
    render_modal(&mut out, &view.modal);
    if let Some(preview) = &view.preview {
        let _ = writeln!(out, "-- Preview: {} -- (close-preview)", preview);
    }
    out
}

fn render_session(out: &mut String, view: &AppViewModel) {
    let status = match (&view.signed_in_as, view.session_resolved) {
        (Some(email), _) => format!("signed in as {}", email),
        (None, true) => "not signed in (login <email> <password>)".to_string(),
        (None, false) => "checking session...".to_string(),
    };
    let pending = if view.auth_pending { " [working]" } else { "" };
    let _ = writeln!(out, "== Tenant Reports == {}{}", status, pending);
    if let Some(err) = &view.auth_error {
        let _ = writeln!(out, "   ! {}", err);
    }
}

fn render_tenants(out: &mut String, view: &AppViewModel) {
    let _ = writeln!(out, "Tenants:");
    if let Some(err) = &view.tenants_error {
        let _ = writeln!(out, "   ! {}", err);
    }
    for (position, row) in view.tenants.iter().enumerate() {
        let mark = if row.selected { 'x' } else { ' ' };
        let _ = writeln!(
            out,
            "  {:>2}. [{}] {} ({})",
            position + 1,
            mark,
            row.name,
            row.domain
        );
    }

    if view.selected.is_empty() {
        let _ = writeln!(out, "No Tenants Currently Selected");
    } else {
        let names: Vec<&str> = view.selected.iter().map(|row| row.name.as_str()).collect();
        let _ = writeln!(
            out,
            "Selected ({}): {}",
            view.selected.len(),
            names.join(", ")
        );
    }

    match view.generate_blocked {
        None => {
            let noun = if view.selected.len() == 1 {
                "Report"
            } else {
                "Reports"
            };
            let _ = writeln!(out, "Generate {}: ready (generate)", noun);
        }
        Some(reason) => {
            let _ = writeln!(out, "Generate: unavailable, {}", reason);
        }
    }
}

fn render_modal(out: &mut String, modal: &ModalView) {
    match modal {
        ModalView::Closed => {}
        ModalView::Generating { position, total } => {
            let _ = writeln!(
                out,
                "-- Generating Reports: {} of {} -- (close to hide)",
                position, total
            );
        }
        ModalView::ShowingResults { cards } => {
            let _ = writeln!(out, "-- Generated Reports -- (close to hide)");
            for card in cards {
                render_card(out, card);
            }
        }
    }
}

fn render_card(out: &mut String, card: &ResultCardView) {
    let number = card.index + 1;
    match &card.status {
        ReportStatus::Ready { .. } => {
            let download = match &card.download {
                None => String::new(),
                Some(DownloadState::InProgress) => "  downloading...".to_string(),
                Some(DownloadState::Saved(path)) => format!("  saved to {}", path.display()),
                Some(DownloadState::Failed(reason)) => format!("  download failed: {}", reason),
            };
            let _ = writeln!(
                out,
                "  {:>2}. {}  [preview {n}] [download {n}]{}",
                number,
                card.name,
                download,
                n = number
            );
        }
        ReportStatus::Failed { reason } => {
            let _ = writeln!(out, "  {:>2}. {}  FAILED: {}", number, card.name, reason);
        }
    }
}
