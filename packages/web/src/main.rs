use dioxus::prelude::*;

use store::FolioConfig;
use ui::{AuthProvider, Backend, NoticeProvider};
use views::{
    Blog, Dashboard, DashboardLayout, DashboardPosts, DashboardProfile, DashboardProjects, Home,
    Login, NotFound, Projects, Shell, Skills,
};

mod views;

#[derive(Debug, Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum Route {
    #[layout(Shell)]
        #[route("/")]
        Home {},
        #[route("/projects")]
        Projects {},
        #[route("/skills")]
        Skills {},
        #[route("/blog")]
        Blog {},
        #[route("/login")]
        Login {},
        #[nest("/dashboard")]
            #[layout(DashboardLayout)]
                #[route("/")]
                Dashboard {},
                #[route("/projects")]
                DashboardProjects {},
                #[route("/posts")]
                DashboardPosts {},
                #[route("/profile")]
                DashboardProfile {},
            #[end_layout]
        #[end_nest]
        #[route("/:..segments")]
        NotFound { segments: Vec<String> },
}

fn main() {
    dioxus::launch(App);
}

#[component]
fn App() -> Element {
    use_context_provider(|| {
        let config = FolioConfig::load();
        tracing::info!(connected = config.is_connected(), "starting portfolio");
        Signal::new(Backend::new(config))
    });

    rsx! {
        NoticeProvider {
            AuthProvider {
                Router::<Route> {}
            }
        }
    }
}
