use leptos::*;

use crate::models::{LineInfo, TrainMarker};

/// Detail card for the currently selected train. Selection itself lives in
/// the app root so a line switch can clear it.
#[component]
#[must_use]
pub fn TrainInfo(
    selected: ReadSignal<Option<TrainMarker>>,
    set_selected: WriteSignal<Option<TrainMarker>>,
    line: Memo<LineInfo>,
) -> impl IntoView {
    move || {
        selected.get().map(|train| {
            let color = line.get().color;
            view! {
                <div class="train-info" style=format!("border-color: {color};")>
                    <div class="train-info-header">
                        <span class="train-no">"Train " {train.train_no.clone()}</span>
                        <button
                            class="train-info-close"
                            on:click=move |_| set_selected.set(None)
                        >
                            "×"
                        </button>
                    </div>
                    <div class="train-info-row">
                        {train.direction.label()}
                        " · to "
                        {train.destination_name.clone()}
                        " · "
                        {train.status.label()}
                    </div>
                    <div class="train-info-row dim">
                        {train.station_name.clone()}
                        {train.is_express.then_some(" · express")}
                        {train.is_last_run.then_some(" · last run")}
                    </div>
                </div>
            }
        })
    }
}
