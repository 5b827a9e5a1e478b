use leptos::*;

use crate::models::LineInfo;

#[component]
#[must_use]
pub fn LineSelector(
    lines: Vec<LineInfo>,
    selected: ReadSignal<String>,
    set_selected: WriteSignal<String>,
) -> impl IntoView {
    view! {
        <div class="line-selector">
            {lines
                .into_iter()
                .map(|line| {
                    let LineInfo { id, name, color, .. } = line;
                    let id_for_class = id.clone();
                    let id_for_style = id.clone();
                    view! {
                        <button
                            class=move || {
                                if selected.get() == id_for_class {
                                    "line-pill active"
                                } else {
                                    "line-pill"
                                }
                            }
                            style=move || {
                                if selected.get() == id_for_style {
                                    format!("background-color: {color}; border-color: {color};")
                                } else {
                                    String::new()
                                }
                            }
                            on:click=move |_| set_selected.set(id.clone())
                        >
                            {name}
                        </button>
                    }
                })
                .collect_view()}
        </div>
    }
}
