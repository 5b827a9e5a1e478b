use chrono::Local;
use leptos::*;
use leptos_meta::*;
use leptos_use::{use_interval_fn, use_media_query};
use wasm_bindgen_futures::spawn_local;

use crate::api;
use crate::components::line_selector::LineSelector;
use crate::components::map_canvas::MapCanvas;
use crate::components::train_info::TrainInfo;
use crate::constants::{COMPACT_MEDIA_QUERY, DEFAULT_LINE_ID, POLL_INTERVAL_MS};
use crate::data;
use crate::models::{TelemetrySnapshot, TrainMarker, TrainPositionRecord};
use crate::position::map_train_position;

#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let lines = data::line_catalog();
    let (selected_line, set_selected_line) = create_signal(DEFAULT_LINE_ID.to_string());
    let (snapshot, set_snapshot) = create_signal(None::<TelemetrySnapshot>);
    let (fetch_error, set_fetch_error) = create_signal(None::<String>);
    let (is_loading, set_is_loading) = create_signal(false);
    let (selected_train, set_selected_train) = create_signal(None::<TrainMarker>);

    let compact = use_media_query(COMPACT_MEDIA_QUERY);

    let topology = create_memo(move |_| data::topology_for(&selected_line.get()));
    let active_line = create_memo(move |_| {
        data::line_info(&selected_line.get())
            .unwrap_or_else(|| data::line_catalog().swap_remove(0))
    });

    // Markers are a pure function of the latest snapshot and the active
    // topology; the memo is the one explicit caching boundary, so a poll
    // that returns an identical snapshot re-renders nothing.
    let markers = create_memo(move |_| -> Vec<TrainMarker> {
        let Some(topology) = topology.get() else {
            return Vec::new();
        };
        match snapshot.get() {
            Some(snap) if snap.line_id == selected_line.get() => snap
                .trains
                .iter()
                .filter_map(|train| map_train_position(train, &topology))
                .collect(),
            _ => Vec::new(),
        }
    });

    let refresh = move || {
        let line_id = selected_line.get_untracked();
        set_is_loading.set(true);
        spawn_local(async move {
            let result = api::fetch_train_positions(&line_id).await;
            // The user may have switched lines while the request was in
            // flight; a stale response must never produce markers.
            if selected_line.get_untracked() != line_id {
                return;
            }
            set_is_loading.set(false);
            match result {
                Ok(response) => {
                    let trains = response
                        .trains
                        .into_iter()
                        .map(TrainPositionRecord::into_telemetry)
                        .collect();
                    set_snapshot.set(Some(TelemetrySnapshot {
                        line_id,
                        diagnostic: response.diagnostic,
                        trains,
                        updated_at: Local::now().format("%H:%M:%S").to_string(),
                    }));
                    set_fetch_error.set(None);
                }
                Err(err) => {
                    leptos::logging::warn!("position fetch failed: {err}");
                    set_fetch_error.set(Some(err));
                }
            }
        });
    };

    // Initial fetch, then again on every line switch. The previous line's
    // snapshot and selection are discarded before the new request starts.
    create_effect(move |_| {
        let _ = selected_line.get();
        set_snapshot.set(None);
        set_selected_train.set(None);
        refresh();
    });

    let _poll = use_interval_fn(refresh, POLL_INTERVAL_MS);

    let status = move || {
        if is_loading.get() {
            ("status-dot loading", "updating")
        } else if fetch_error.get().is_some() {
            ("status-dot error", "connection lost")
        } else {
            ("status-dot live", "live")
        }
    };

    let train_count = move || markers.with(Vec::len);
    let updated_at = move || snapshot.get().map(|s| s.updated_at);
    let idle_message = move || {
        if fetch_error.get().is_some() || is_loading.get() {
            return None;
        }
        snapshot.get().and_then(|snap| {
            if snap.trains.is_empty() {
                Some(
                    snap.diagnostic
                        .unwrap_or_else(|| "No trains currently in service".to_string()),
                )
            } else {
                None
            }
        })
    };

    view! {
        <Stylesheet id="main" href="/styles.css"/>
        <Title text="Live Transit Map"/>

        <div class="app">
            <header class="app-header">
                <div class="header-row">
                    <h1>"Live Transit Map"</h1>
                    <div class="poll-status">
                        <span class=move || status().0></span>
                        <span>{move || status().1}</span>
                    </div>
                </div>
                <LineSelector
                    lines=lines
                    selected=selected_line
                    set_selected=set_selected_line
                />
            </header>

            <main class="map-area">
                <MapCanvas
                    topology=topology
                    markers=markers
                    line=active_line
                    compact=compact
                    selected_train=selected_train
                    set_selected_train=set_selected_train
                />

                <Show when=move || { train_count() > 0 }>
                    <div class="badge badge-count">
                        {train_count} " trains running"
                    </div>
                </Show>

                {move || updated_at().map(|time| view! {
                    <div class="badge badge-updated">"updated " {time}</div>
                })}

                {move || fetch_error.get().map(|_| view! {
                    <div class="banner banner-error">"Live data is unavailable"</div>
                })}

                {move || idle_message().map(|message| view! {
                    <div class="banner banner-idle">{message}</div>
                })}

                <TrainInfo
                    selected=selected_train
                    set_selected=set_selected_train
                    line=active_line
                />
            </main>
        </div>
    }
}