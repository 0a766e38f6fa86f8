use web_sys::HtmlInputElement;
use yew::prelude::*;

use crate::hooks::{DrawArgs, ImageResult, WrappedImage, use_wrapped_image};

const CAPTION_HEIGHT: f64 = 160.0;

/// Wraps an image in a captioned 1080x1080 frame.
#[function_component]
pub fn ImageDemoPage() -> Html {
    let input_value = use_state(String::new);
    let img = use_state(|| None::<AttrValue>);

    // Stable identity, so the image is only composed when `img` changes.
    let draw = use_callback((), |args: DrawArgs, _| {
        let DrawArgs {
            context,
            width,
            height,
        } = args;
        let (width, height) = (f64::from(width), f64::from(height));

        context.set_fill_style_str("rgba(0, 0, 0, 0.6)");
        context.fill_rect(0.0, height - CAPTION_HEIGHT, width, CAPTION_HEIGHT);
        context.set_fill_style_str("#ffffff");
        context.set_font("64px sans-serif");
        if let Err(e) = context.fill_text("wrapped", 48.0, height - 56.0) {
            tracing::warn!("Could not draw caption: {e:?}");
        }
    });

    let result = use_wrapped_image(WrappedImage {
        img: (*img).clone(),
        draw: Some(draw),
    });

    let on_input = {
        let input_value = input_value.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            input_value.set(input.value());
        })
    };

    let on_submit = {
        let input_value = input_value.clone();
        let img = img.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let value = input_value.trim();
            img.set((!value.is_empty()).then(|| value.to_string().into()));
        })
    };

    let preview = match &result {
        ImageResult::Pending => html! {
            <p class="text-neutral-600 dark:text-neutral-400">
                {"Waiting for the image to load..."}
            </p>
        },
        ImageResult::Ready(data_url) => html! {
            <img
                src={data_url.clone()}
                alt="Wrapped image"
                class="w-full max-w-lg rounded-md"
            />
        },
        ImageResult::Failed(error) => html! {
            <p class="text-sm text-red-700 dark:text-red-400">
                {error.to_string()}
            </p>
        },
    };

    html! {
        <div class="space-y-6">
            <form onsubmit={on_submit} class="flex gap-2">
                <input
                    type="text"
                    placeholder="Image URL"
                    class="flex-1 px-3 py-2 border border-neutral-300 \
                           dark:border-neutral-600 rounded-md"
                    value={(*input_value).clone()}
                    oninput={on_input}
                />
                <button
                    type="submit"
                    class="px-4 py-2 rounded-md bg-neutral-900 text-white"
                >
                    {"Wrap"}
                </button>
            </form>
            {preview}
        </div>
    }
}
