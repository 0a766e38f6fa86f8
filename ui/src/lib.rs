use hooks_core::ReqwestFetcher;
use yew::prelude::*;
use yew_router::prelude::*;

pub mod hooks;
mod logs;
mod pages;

use pages::{FetchDemoPage, ImageDemoPage, NotFoundPage};

// Transport for use_fetch - configurable via environment or same-origin
// fallback
pub fn get_fetcher() -> ReqwestFetcher {
    // Try environment variable first (set at build time)
    let address = option_env!("BACKEND_URL")
        .map(|url| url.to_string())
        .or_else(|| {
            // Fallback to same origin
            web_sys::window().and_then(|window| window.location().origin().ok())
        });

    match address {
        Some(address) => ReqwestFetcher::with_address(address),
        None => ReqwestFetcher::new(),
    }
}

#[function_component]
pub fn App() -> Html {
    logs::init_logging();
    html! {
        <BrowserRouter>
            <div class="min-h-screen bg-white dark:bg-gray-900 text-gray-900 dark:text-gray-100 transition-colors">
                <Switch<Route> render={switch} />
            </div>
        </BrowserRouter>
    }
}

#[derive(Clone, Routable, PartialEq)]
enum Route {
    #[at("/")]
    Fetch,
    #[at("/image")]
    Image,
    #[not_found]
    #[at("/404")]
    NotFound,
}

fn switch(routes: Route) -> Html {
    let page = match routes {
        Route::Fetch => html! { <FetchDemoPage /> },
        Route::Image => html! { <ImageDemoPage /> },
        Route::NotFound => html! { <NotFoundPage /> },
    };
    html! {
        <main class="max-w-7xl mx-auto px-4 sm:px-6 lg:px-8 py-8">
            <nav class="flex gap-4 mb-8 text-sm">
                <Link<Route> to={Route::Fetch}>{"Fetch"}</Link<Route>>
                <Link<Route> to={Route::Image}>{"Image"}</Link<Route>>
            </nav>
            {page}
        </main>
    }
}
