use std::rc::Rc;

use hooks_core::{
    FetchAction, FetchConfig, FetchController, FetchState, Fetcher,
    RequestOptions,
};
use serde::de::DeserializeOwned;
use yew::prelude::*;

/// [`FetchState`] adapted to `use_reducer`.
#[derive(Clone)]
struct FetchReducer<T>(FetchState<T>);

impl<T: Clone> Reducible for FetchReducer<T> {
    type Action = FetchAction<T>;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let FetchReducer(state) = Rc::unwrap_or_clone(self);
        Rc::new(FetchReducer(state.reduce(action)))
    }
}

/// Fetch `url` and decode the JSON body into `T`.
///
/// A new cycle starts whenever `url` changes; `options` are read at that
/// moment but changing them alone does not refetch. `Loading` is dispatched
/// from the effect itself, so the next render already shows it. Results
/// from a cycle that has since been superseded, or from a component that
/// has unmounted, are dropped. With `config.cache_enabled`, successful bodies are kept per
/// URL for the lifetime of the component.
///
/// # Example
///
/// ```ignore
/// #[function_component]
/// fn Greeting() -> Html {
///     let state = use_fetch::<Greeting>(
///         Some("/api/greeting".into()),
///         RequestOptions::get(),
///         FetchConfig::cached(),
///     );
///     match state {
///         FetchState::Fetched(greeting) => html! { <p>{greeting.text}</p> },
///         FetchState::Failed(e) => html! { <p>{e.to_string()}</p> },
///         _ => html! { <p>{"Loading..."}</p> },
///     }
/// }
/// ```
#[hook]
pub fn use_fetch<T>(
    url: Option<AttrValue>,
    options: RequestOptions,
    config: FetchConfig,
) -> FetchState<T>
where
    T: DeserializeOwned + Clone + 'static,
{
    let fetcher = use_memo((), |_| -> Rc<dyn Fetcher> {
        Rc::new(crate::get_fetcher())
    });
    use_fetch_with((*fetcher).clone(), url, options, config)
}

/// [`use_fetch`] with an explicit transport.
#[hook]
pub fn use_fetch_with<T>(
    fetcher: Rc<dyn Fetcher>,
    url: Option<AttrValue>,
    options: RequestOptions,
    config: FetchConfig,
) -> FetchState<T>
where
    T: DeserializeOwned + Clone + 'static,
{
    let state = use_reducer(|| FetchReducer(FetchState::Idle));
    // The cache belongs to this component instance, so the config is only
    // read on mount.
    let controller = use_memo((), move |_| FetchController::<T>::new(config));

    {
        let dispatcher = state.dispatcher();
        use_effect_with(url, move |url| {
            let dispatch =
                move |action: FetchAction<T>| dispatcher.dispatch(action);
            let url = url.as_ref().map(|url| url.to_string());

            if let Some(cycle) =
                controller.on_url_change(fetcher, url, options, dispatch)
            {
                yew::platform::spawn_local(async move {
                    cycle.await;
                });
            }

            // runs when the url changes again or the component unmounts
            move || controller.supersede()
        });
    }

    state.0.clone()
}
