use catalog_core::{Metric, SortSpec, BRAND, LAYOUT, TYPEFACE, YEAR};
use leptos::*;
use leptos_meta::*;

#[cfg(target_arch = "wasm32")]
use crate::{state::provide_catalog_ctx, theme::GLOBAL_CSS};
#[cfg(target_arch = "wasm32")]
use catalog_core::{
    bar_percent, column_label, filter_records, format_cell, machine_link, parse_catalog,
    pivot_groups, sort_view, EMPTY_CELL, LIST_VIEW_COLUMNS,
};
#[cfg(target_arch = "wasm32")]
use gloo_net::http::Request;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::JsValue;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen_futures::spawn_local;
/// Site-relative path of the catalog document produced by the build-time
/// CSV conversion.
pub const CATALOG_URL: &str = "/typewriters.json";

/// Message shown in the table body when the catalog fetch fails.
pub const LOAD_ERROR_MESSAGE: &str = "Error loading data. Please ensure typewriters.json exists.";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewMode {
    List,
    Pivot,
}

impl ViewMode {
    pub fn label(&self) -> &'static str {
        match self {
            ViewMode::List => "List view",
            ViewMode::Pivot => "Pivot view",
        }
    }
}

/// Options offered by the sort selector, in `"field|dir"` encoding. The
/// blank entry clears the sort and restores catalog order.
pub const SORT_OPTIONS: &[(&str, &str)] = &[
    ("", "Original order"),
    ("Typewriter Brand|asc", "Make (A-Z)"),
    ("Typewriter Brand|desc", "Make (Z-A)"),
    ("Model|asc", "Model (A-Z)"),
    ("Year|asc", "Year (oldest first)"),
    ("Year|desc", "Year (newest first)"),
    ("Pitch|asc", "Pitch"),
];

/// Fields offered by the pivot grouping selector.
pub const PIVOT_GROUP_OPTIONS: &[(&str, &str)] = &[
    (BRAND, "Make"),
    (YEAR, "Year"),
    (TYPEFACE, "Typeface"),
    (LAYOUT, "Layout"),
];

pub const PIVOT_METRIC_OPTIONS: &[(&str, &str)] = &[
    ("count", "Count"),
    ("value", "Value ($)"),
    ("purchase", "Purchase ($)"),
];

pub fn pill_class(active: bool) -> String {
    format!(
        "pill selectable {}",
        if active { "active" } else { "" }
    )
}

pub fn view_class(active: bool) -> String {
    format!("panel view {}", if active { "active" } else { "" })
}

pub fn member_label(count: usize) -> String {
    if count == 1 {
        "1 machine".to_string()
    } else {
        format!("{count} machines")
    }
}

#[cfg(target_arch = "wasm32")]
fn last_updated_label() -> String {
    let now = js_sys::Date::new_0();
    format!(
        "{} {}",
        String::from(now.to_locale_date_string("en-US", &JsValue::UNDEFINED)),
        String::from(now.to_locale_time_string("en-US"))
    )
}

#[cfg(not(target_arch = "wasm32"))]
#[component]
pub fn App() -> impl IntoView {
    view! { <div>UI available in browser build.</div> }
}

#[cfg(target_arch = "wasm32")]
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let ctx = provide_catalog_ctx();

    let (search_query, set_search_query) = create_signal(String::new());
    let (sort_value, set_sort_value) = create_signal(String::new());
    let (view_mode, set_view_mode) = create_signal(ViewMode::List);
    let (pivot_group, set_pivot_group) = create_signal(BRAND.to_string());
    let (pivot_metric, set_pivot_metric) = create_signal("count".to_string());

    // Single catalog fetch, once per page view. Failures are logged and
    // surfaced as the error row; the widget never throws past its
    // boundary and never retries.
    {
        let catalog = ctx.catalog;
        let load_error = ctx.load_error;
        let loaded = ctx.loaded;
        spawn_local(async move {
            let outcome = match Request::get(CATALOG_URL).send().await {
                Ok(resp) if resp.ok() => match resp.text().await {
                    Ok(body) => parse_catalog(&body).map_err(|e| e.to_string()),
                    Err(e) => Err(e.to_string()),
                },
                Ok(resp) => Err(format!("HTTP {}", resp.status())),
                Err(e) => Err(e.to_string()),
            };
            match outcome {
                Ok(records) => catalog.set(records),
                Err(reason) => {
                    web_sys::console::error_1(&JsValue::from_str(&format!(
                        "Error loading typewriters: {reason}"
                    )));
                    load_error.set(Some(LOAD_ERROR_MESSAGE.to_string()));
                }
            }
            loaded.set(true);
        });
    }

    // The displayed view is a derived projection: filter, then sort.
    // Clearing the sort keeps the filter's membership and falls back to
    // catalog load order.
    let view = create_memo(move |_| {
        let mut rows = ctx.catalog.with(|c| filter_records(c, &search_query.get()));
        if let Some(spec) = SortSpec::parse(&sort_value.get()) {
            sort_view(&mut rows, &spec);
        }
        rows
    });

    // Pivot always aggregates the full catalog, ignoring the search
    // filter.
    let groups = create_memo(move |_| {
        let field = pivot_group.get();
        let metric = Metric::parse(&pivot_metric.get());
        ctx.catalog.with(|c| pivot_groups(c, &field, metric))
    });

    view! {
        <Style>{GLOBAL_CSS}</Style>
        <main class="catalog-shell">
            <header class="panel catalog-topbar">
                <div class="brand-mark">
                    <span class="brand-title">"Typewriter Collection"</span>
                    <span class="pill">"catalog"</span>
                </div>
                <div class="view-toggle">
                    <button
                        id="list-view-btn"
                        class=move || pill_class(view_mode.get() == ViewMode::List)
                        on:click=move |_| set_view_mode.set(ViewMode::List)
                    >
                        {ViewMode::List.label()}
                    </button>
                    <button
                        id="pivot-view-btn"
                        class=move || pill_class(view_mode.get() == ViewMode::Pivot)
                        on:click=move |_| set_view_mode.set(ViewMode::Pivot)
                    >
                        {ViewMode::Pivot.label()}
                    </button>
                </div>
            </header>

            <section id="list-view" class=move || view_class(view_mode.get() == ViewMode::List)>
                <div class="catalog-controls">
                    <div class="control-stack">
                        <label class="input-label" for="search-input">"Search"</label>
                        <input
                            id="search-input"
                            name="search-input"
                            type="text"
                            placeholder="Search the collection..."
                            value=move || search_query.get()
                            on:input=move |ev| set_search_query.set(event_target_value(&ev))
                        />
                    </div>
                    <div class="control-stack">
                        <label class="input-label" for="sort-select">"Sort"</label>
                        <select
                            id="sort-select"
                            name="sort-select"
                            value=move || sort_value.get()
                            on:change=move |ev| set_sort_value.set(event_target_value(&ev))
                        >
                            {SORT_OPTIONS
                                .iter()
                                .map(|&(value, label)| view! { <option value=value>{label}</option> })
                                .collect_view()}
                        </select>
                    </div>
                    <div class="control-spacer"></div>
                    <div class="table-count-wrap">
                        <span id="table-count" class="table-count">
                            {move || view.get().len()}
                        </span>
                        " machines shown"
                    </div>
                </div>
                <div class="catalog-table-wrap">
                    <table id="typewriters-table" class="catalog-table">
                        <thead id="table-head">
                            <tr>
                                {LIST_VIEW_COLUMNS
                                    .iter()
                                    .map(|col| view! { <th>{column_label(col)}</th> })
                                    .collect_view()}
                                <th>"Link"</th>
                            </tr>
                        </thead>
                        <tbody id="table-body">
                            {move || {
                                if let Some(err) = ctx.load_error.get() {
                                    return view! {
                                        <tr><td colspan="9" class="table-note">{err}</td></tr>
                                    }
                                    .into_view();
                                }
                                if !ctx.loaded.get() {
                                    return view! {
                                        <tr><td colspan="9" class="table-note">"Loading catalog..."</td></tr>
                                    }
                                    .into_view();
                                }
                                let rows = view.get();
                                if rows.is_empty() {
                                    return view! {
                                        <tr><td colspan="9" class="table-note">"No typewriters found."</td></tr>
                                    }
                                    .into_view();
                                }
                                rows.into_iter()
                                    .map(|record| {
                                        let cells = LIST_VIEW_COLUMNS
                                            .iter()
                                            .map(|col| {
                                                let text = format_cell(record.get(col));
                                                let class = if text == EMPTY_CELL { "empty" } else { "" };
                                                view! { <td class=class>{text}</td> }
                                            })
                                            .collect_view();
                                        let link_cell = match machine_link(&record) {
                                            Some(href) => view! {
                                                <td><a class="machine-link" href=href>"View Page"</a></td>
                                            }
                                            .into_view(),
                                            None => view! {
                                                <td><span class="empty">{EMPTY_CELL}</span></td>
                                            }
                                            .into_view(),
                                        };
                                        view! { <tr>{cells}{link_cell}</tr> }.into_view()
                                    })
                                    .collect_view()
                            }}
                        </tbody>
                    </table>
                </div>
            </section>

            <section id="pivot-view" class=move || view_class(view_mode.get() == ViewMode::Pivot)>
                <div class="catalog-controls">
                    <div class="control-stack">
                        <label class="input-label" for="pivot-group">"Group by"</label>
                        <select
                            id="pivot-group"
                            name="pivot-group"
                            value=move || pivot_group.get()
                            on:change=move |ev| set_pivot_group.set(event_target_value(&ev))
                        >
                            {PIVOT_GROUP_OPTIONS
                                .iter()
                                .map(|&(value, label)| view! { <option value=value>{label}</option> })
                                .collect_view()}
                        </select>
                    </div>
                    <div class="control-stack">
                        <label class="input-label" for="pivot-metric">"Metric"</label>
                        <select
                            id="pivot-metric"
                            name="pivot-metric"
                            value=move || pivot_metric.get()
                            on:change=move |ev| set_pivot_metric.set(event_target_value(&ev))
                        >
                            {PIVOT_METRIC_OPTIONS
                                .iter()
                                .map(|&(value, label)| view! { <option value=value>{label}</option> })
                                .collect_view()}
                        </select>
                    </div>
                </div>
                <div id="pivot-chart" class="pivot-panel">
                    {move || {
                        let groups = groups.get();
                        if groups.is_empty() {
                            return view! {
                                <div class="pivot-empty">"No typewriters found."</div>
                            }
                            .into_view();
                        }
                        let metric = Metric::parse(&pivot_metric.get());
                        // Groups come back sorted descending, so the first
                        // carries the maximum.
                        let max = groups.first().map(|g| g.value).unwrap_or(0.0);
                        view! {
                            <div class="pivot-list">
                                {groups
                                    .into_iter()
                                    .map(|group| {
                                        let width = format!("width: {:.4}%", bar_percent(group.value, max));
                                        let value_label = metric.format(group.value);
                                        let members = member_label(group.count);
                                        view! {
                                            <div class="pivot-item">
                                                <div class="pivot-header">
                                                    <span class="pivot-label">{group.key.clone()}</span>
                                                    <span class="pivot-value">{value_label}</span>
                                                </div>
                                                <div class="pivot-bar-container">
                                                    <div class="pivot-bar" style=width></div>
                                                </div>
                                                <div class="pivot-details">
                                                    <small>{members}</small>
                                                </div>
                                            </div>
                                        }
                                    })
                                    .collect_view()}
                            </div>
                        }
                        .into_view()
                    }}
                </div>
            </section>

            <footer class="panel catalog-footer">
                <span id="last-updated">{format!("Last updated: {}", last_updated_label())}</span>
            </footer>
        </main>
    }
}
