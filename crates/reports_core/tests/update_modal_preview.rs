mod support;

use reports_core::{update, DownloadState, Effect, ModalPhase, ModalView, Msg};
use support::{complete_ok, finish, init_logging, ready_state, select, start_run};

fn finished_two_tenant_run() -> reports_core::AppState {
    let state = select(ready_state(), &["tenantA.com", "tenantB.com"]);
    let (state, batch_id, _) = start_run(state);
    let state = complete_ok(state, batch_id, "tenantA.com", "Tenant A");
    let state = complete_ok(state, batch_id, "tenantB.com", "Tenant B");
    finish(state, batch_id)
}

#[test]
fn closing_modal_while_generating_keeps_the_run_going() {
    init_logging();
    let state = select(ready_state(), &["tenantA.com", "tenantB.com"]);
    let (state, batch_id, _) = start_run(state);
    assert_eq!(state.modal_phase(), ModalPhase::Generating);

    let (state, effects) = update(state, Msg::ModalCloseClicked);
    assert!(effects.is_empty());
    assert_eq!(state.modal_phase(), ModalPhase::Closed);
    assert!(state.is_generating());

    let state = complete_ok(state, batch_id, "tenantA.com", "Tenant A");
    let (state, _) = update(state, Msg::ModalReopenClicked);
    assert_eq!(
        state.view().modal,
        ModalView::Generating {
            position: 2,
            total: 2
        }
    );

    let state = complete_ok(state, batch_id, "tenantB.com", "Tenant B");
    let state = finish(state, batch_id);
    assert_eq!(state.modal_phase(), ModalPhase::ShowingResults);
}

#[test]
fn modal_stays_closed_when_run_finishes_after_close() {
    init_logging();
    let state = select(ready_state(), &["tenantA.com"]);
    let (state, batch_id, _) = start_run(state);
    let (state, _) = update(state, Msg::ModalCloseClicked);
    let state = complete_ok(state, batch_id, "tenantA.com", "Tenant A");
    let state = finish(state, batch_id);

    assert_eq!(state.modal_phase(), ModalPhase::Closed);
    assert_eq!(state.run().results().len(), 1);
}

#[test]
fn reopen_without_any_run_is_ignored() {
    init_logging();
    let (mut state, effects) = update(ready_state(), Msg::ModalReopenClicked);
    state.consume_dirty();

    assert!(effects.is_empty());
    assert!(!state.is_modal_visible());
}

#[test]
fn preview_open_and_close_leave_modal_and_run_untouched() {
    init_logging();
    let state = finished_two_tenant_run();
    let modal_before = state.is_modal_visible();
    let generating_before = state.is_generating();

    let (state, _) = update(state, Msg::PreviewRequested { index: 1 });
    assert_eq!(state.preview(), Some("/p/tenantB"));
    assert_eq!(state.view().preview.as_deref(), Some("/p/tenantB"));

    let (state, _) = update(state, Msg::PreviewClosed);
    assert_eq!(state.preview(), None);
    assert_eq!(state.is_modal_visible(), modal_before);
    assert_eq!(state.is_generating(), generating_before);
}

#[test]
fn latest_preview_request_wins() {
    init_logging();
    let state = finished_two_tenant_run();
    let (state, _) = update(state, Msg::PreviewRequested { index: 0 });
    let (state, _) = update(state, Msg::PreviewRequested { index: 1 });

    assert_eq!(state.preview(), Some("/p/tenantB"));
}

#[test]
fn closing_modal_keeps_preview_open() {
    init_logging();
    let state = finished_two_tenant_run();
    let (state, _) = update(state, Msg::PreviewRequested { index: 0 });
    let (state, _) = update(state, Msg::ModalCloseClicked);

    assert_eq!(state.modal_phase(), ModalPhase::Closed);
    assert_eq!(state.preview(), Some("/p/tenantA"));
}

#[test]
fn preview_is_ignored_for_failed_or_unknown_cards() {
    init_logging();
    let state = select(ready_state(), &["tenantA.com"]);
    let (state, batch_id, _) = start_run(state);
    let (state, _) = update(
        state,
        Msg::ReportCompleted {
            batch_id,
            tenant_id: "tenantA.com".to_string(),
            outcome: Err("network error".to_string()),
        },
    );
    let state = finish(state, batch_id);

    let (state, _) = update(state, Msg::PreviewRequested { index: 0 });
    assert_eq!(state.preview(), None);
    let (state, effects) = update(state, Msg::DownloadRequested { index: 3 });
    assert_eq!(state.preview(), None);
    assert!(effects.is_empty());
}

#[test]
fn preview_is_ignored_while_generating() {
    init_logging();
    let state = select(ready_state(), &["tenantA.com", "tenantB.com"]);
    let (state, batch_id, _) = start_run(state);
    let state = complete_ok(state, batch_id, "tenantA.com", "Tenant A");

    let (state, _) = update(state, Msg::PreviewRequested { index: 0 });

    assert_eq!(state.preview(), None);
}

#[test]
fn download_passes_reference_unmodified_and_tracks_state() {
    init_logging();
    let state = finished_two_tenant_run();

    let (state, effects) = update(state, Msg::DownloadRequested { index: 0 });
    assert_eq!(
        effects,
        vec![Effect::Download {
            tenant_id: "tenantA.com".to_string(),
            download: "/d/tenantA".to_string(),
        }]
    );
    assert_eq!(
        state.download_state("tenantA.com"),
        Some(&DownloadState::InProgress)
    );

    let (state, effects) = update(state, Msg::DownloadRequested { index: 0 });
    assert!(effects.is_empty());

    let saved = std::path::PathBuf::from("reports/tenantA.com-report.pdf");
    let (state, _) = update(
        state,
        Msg::DownloadCompleted {
            tenant_id: "tenantA.com".to_string(),
            result: Ok(saved.clone()),
        },
    );
    assert_eq!(
        state.download_state("tenantA.com"),
        Some(&DownloadState::Saved(saved.clone()))
    );

    let ModalView::ShowingResults { cards } = state.view().modal else {
        panic!("expected results");
    };
    assert_eq!(cards[0].download, Some(DownloadState::Saved(saved)));
    assert_eq!(cards[1].download, None);
}

fn rerun_for_tenant_a(state: reports_core::AppState) -> reports_core::AppState {
    let (state, batch_id, _) = start_run(state);
    let state = complete_ok(state, batch_id, "tenantA.com", "Tenant A");
    let state = complete_ok(state, batch_id, "tenantB.com", "Tenant B");
    finish(state, batch_id)
}

#[test]
fn new_run_starts_with_fresh_download_state() {
    init_logging();
    let state = finished_two_tenant_run();
    let (state, _) = update(state, Msg::DownloadRequested { index: 0 });
    let (state, _) = update(
        state,
        Msg::DownloadCompleted {
            tenant_id: "tenantA.com".to_string(),
            result: Ok(std::path::PathBuf::from("reports/tenantA.com-report.pdf")),
        },
    );

    let state = rerun_for_tenant_a(state);

    assert_eq!(state.download_state("tenantA.com"), None);
    let ModalView::ShowingResults { cards } = state.view().modal else {
        panic!("expected results");
    };
    assert_eq!(cards[0].download, None);
}

#[test]
fn download_left_running_by_previous_run_does_not_block_or_leak() {
    init_logging();
    let state = finished_two_tenant_run();
    let (state, _) = update(state, Msg::DownloadRequested { index: 0 });

    let state = rerun_for_tenant_a(state);

    let (state, _) = update(
        state,
        Msg::DownloadCompleted {
            tenant_id: "tenantA.com".to_string(),
            result: Ok(std::path::PathBuf::from("reports/tenantA.com-report.pdf")),
        },
    );
    assert_eq!(state.download_state("tenantA.com"), None);

    let (state, effects) = update(state, Msg::DownloadRequested { index: 0 });
    assert_eq!(
        effects,
        vec![Effect::Download {
            tenant_id: "tenantA.com".to_string(),
            download: "/d/tenantA".to_string(),
        }]
    );
    assert_eq!(
        state.download_state("tenantA.com"),
        Some(&DownloadState::InProgress)
    );
}
