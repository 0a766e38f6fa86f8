use web_sys::HtmlInputElement;
use yew::prelude::*;

use crate::hooks::{FetchConfig, FetchState, RequestOptions, use_fetch};

/// Fetches whatever JSON endpoint is typed in, with the per-page cache on.
#[function_component]
pub fn FetchDemoPage() -> Html {
    let input_value = use_state(|| "/api/health_check".to_string());
    let url = use_state(|| None::<AttrValue>);

    let state: FetchState<serde_json::Value> = use_fetch(
        (*url).clone(),
        RequestOptions::get(),
        FetchConfig::cached(),
    );

    let on_input = {
        let input_value = input_value.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            input_value.set(input.value());
        })
    };

    let on_submit = {
        let input_value = input_value.clone();
        let url = url.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let value = input_value.trim();
            url.set((!value.is_empty()).then(|| value.to_string().into()));
        })
    };

    let body = match &state {
        FetchState::Idle => html! {
            <p class="text-neutral-600 dark:text-neutral-400">
                {"Enter a URL to fetch."}
            </p>
        },
        FetchState::Loading => html! {
            <p class="text-neutral-600 dark:text-neutral-400">
                {"Loading..."}
            </p>
        },
        FetchState::Fetched(data) => html! {
            <pre class="p-4 rounded-md bg-neutral-100 dark:bg-neutral-800 \
                        text-sm overflow-x-auto">
                {serde_json::to_string_pretty(data).unwrap_or_default()}
            </pre>
        },
        FetchState::Failed(error) => html! {
            <div class="p-4 rounded-md bg-red-50 dark:bg-red-900/20 border \
                        border-red-200 dark:border-red-800">
                <p class="text-sm text-red-700 dark:text-red-400">
                    {format!("Error: {}", error)}
                </p>
            </div>
        },
    };

    html! {
        <div class="space-y-6">
            <form onsubmit={on_submit} class="flex gap-2">
                <input
                    type="text"
                    class="flex-1 px-3 py-2 border border-neutral-300 \
                           dark:border-neutral-600 rounded-md"
                    value={(*input_value).clone()}
                    oninput={on_input}
                />
                <button
                    type="submit"
                    class="px-4 py-2 rounded-md bg-neutral-900 text-white"
                >
                    {"Fetch"}
                </button>
            </form>
            <p class="text-sm text-neutral-500">
                {format!("Status: {}", state.status())}
            </p>
            {body}
        </div>
    }
}
