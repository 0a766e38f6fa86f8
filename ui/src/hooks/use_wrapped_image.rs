use std::cell::RefCell;
use std::rc::Rc;

use hooks_core::compositor::SENTINEL_SOURCE;
use hooks_core::{
    CANVAS_HEIGHT, CANVAS_WIDTH, CompositeError, CompositionState,
    ImageResult,
};
use wasm_bindgen::prelude::*;
use web_sys::{
    CanvasRenderingContext2d, Event, HtmlCanvasElement, HtmlImageElement,
};
use yew::prelude::*;

/// What the drawing callback receives once the source image is on the
/// canvas.
#[derive(Clone)]
pub struct DrawArgs {
    pub context: CanvasRenderingContext2d,
    pub width: u32,
    pub height: u32,
}

/// Input to [`use_wrapped_image`].
///
/// Also the composition key: the image is composed once per distinct
/// `(img, draw)` pair, where callbacks compare by identity. Create `draw`
/// with `use_callback` so it stays stable across renders.
#[derive(Clone, PartialEq, Default)]
pub struct WrappedImage {
    pub img: Option<AttrValue>,
    pub draw: Option<Callback<DrawArgs>>,
}

impl WrappedImage {
    /// Whether `self` differs from `previous` only by the callback's
    /// identity.
    fn only_draw_changed(&self, previous: &WrappedImage) -> bool {
        self.img == previous.img && self.draw != previous.draw
    }
}

type SharedComposition = Rc<RefCell<CompositionState<WrappedImage>>>;

/// Draw `img` onto a 1080x1080 canvas, apply `draw`, and return the result
/// as a lossless WEBP data URL.
///
/// Returns [`ImageResult::Pending`] until the image has decoded. A missing
/// 2D context or an image that fails to load ends in
/// [`ImageResult::Failed`].
#[hook]
pub fn use_wrapped_image(input: WrappedImage) -> ImageResult {
    let result = use_state_eq(ImageResult::default);
    let composition = use_mut_ref(CompositionState::<WrappedImage>::default);

    {
        let result = result.clone();
        use_effect_with(input, move |input| {
            let redraw_only = composition
                .borrow()
                .active_key()
                .is_some_and(|previous| input.only_draw_changed(previous));
            if redraw_only {
                tracing::debug!(
                    source = input.img.as_deref().unwrap_or(SENTINEL_SOURCE),
                    "Recomposing because the draw callback changed identity"
                );
            }

            let pending = if composition.borrow_mut().begin(input.clone()) {
                result.set(ImageResult::Pending);
                start(input.clone(), composition, result)
            } else {
                None
            };

            move || drop(pending)
        });
    }

    (*result).clone()
}

/// Keeps the image element and its handlers alive until the composition
/// finishes or its input changes.
struct PendingImage {
    image: HtmlImageElement,
    _onload: Closure<dyn FnMut(Event)>,
    _onerror: Closure<dyn FnMut(Event)>,
}

impl Drop for PendingImage {
    fn drop(&mut self) {
        self.image.set_onload(None);
        self.image.set_onerror(None);
    }
}

fn start(
    input: WrappedImage,
    composition: SharedComposition,
    result: UseStateHandle<ImageResult>,
) -> Option<PendingImage> {
    let finish: Rc<dyn Fn(Result<String, CompositeError>)> = {
        let input = input.clone();
        Rc::new(move |outcome: Result<String, CompositeError>| {
            let mut composition = composition.borrow_mut();
            if composition.finish(&input, outcome) {
                result.set(composition.result().clone());
            }
        })
    };

    let (canvas, context) = match create_canvas() {
        Ok(created) => created,
        Err(e) => {
            tracing::warn!("Cannot compose image: {e}");
            finish(Err(e));
            return None;
        }
    };

    let image = match HtmlImageElement::new() {
        Ok(image) => image,
        Err(_) => {
            finish(Err(CompositeError::SourceUnavailable(
                "could not create image element".into(),
            )));
            return None;
        }
    };

    let onload = {
        let image = image.clone();
        let finish = finish.clone();
        let draw = input.draw.clone();
        Closure::wrap(Box::new(move |_: Event| {
            finish(render(&canvas, &context, &image, draw.as_ref()));
        }) as Box<dyn FnMut(_)>)
    };

    let onerror = {
        let source = input.img.clone();
        Closure::wrap(Box::new(move |_: Event| {
            let source = source.as_deref().unwrap_or(SENTINEL_SOURCE);
            tracing::warn!(source, "Image failed to load");
            finish(Err(CompositeError::Decode(format!(
                "{source} failed to load"
            ))));
        }) as Box<dyn FnMut(_)>)
    };

    image.set_onload(Some(onload.as_ref().unchecked_ref()));
    image.set_onerror(Some(onerror.as_ref().unchecked_ref()));
    image.set_src(input.img.as_deref().unwrap_or(SENTINEL_SOURCE));

    Some(PendingImage {
        image,
        _onload: onload,
        _onerror: onerror,
    })
}

fn create_canvas()
-> Result<(HtmlCanvasElement, CanvasRenderingContext2d), CompositeError> {
    let document = web_sys::window()
        .and_then(|window| window.document())
        .ok_or(CompositeError::ContextUnavailable)?;
    let canvas: HtmlCanvasElement = document
        .create_element("canvas")
        .ok()
        .and_then(|element| element.dyn_into().ok())
        .ok_or(CompositeError::ContextUnavailable)?;
    canvas.set_width(CANVAS_WIDTH);
    canvas.set_height(CANVAS_HEIGHT);

    let context: CanvasRenderingContext2d = canvas
        .get_context("2d")
        .ok()
        .flatten()
        .and_then(|context| context.dyn_into().ok())
        .ok_or(CompositeError::ContextUnavailable)?;
    Ok((canvas, context))
}

fn render(
    canvas: &HtmlCanvasElement,
    context: &CanvasRenderingContext2d,
    image: &HtmlImageElement,
    draw: Option<&Callback<DrawArgs>>,
) -> Result<String, CompositeError> {
    context
        .draw_image_with_html_image_element(image, 0.0, 0.0)
        .map_err(|e| CompositeError::Decode(format!("{e:?}")))?;

    if let Some(draw) = draw {
        draw.emit(DrawArgs {
            context: context.clone(),
            width: canvas.width(),
            height: canvas.height(),
        });
    }

    canvas
        .to_data_url_with_type_and_encoder_options(
            "image/webp",
            &JsValue::from_f64(1.0),
        )
        .map_err(|e| CompositeError::Encode(format!("{e:?}")))
}
