use chrono::{Datelike, Utc};
use dioxus::prelude::*;
use store::catalog::site_profile;

use crate::backend::use_backend;
use crate::icons::brands::{FaGithub, FaLinkedin, FaTwitter};
use crate::Icon;

/// Page footer: quick links from the platform package plus the owner's social
/// links. A failed profile load just leaves the social column empty.
#[component]
pub fn SiteFooter(children: Element) -> Element {
    let backend = use_backend();
    let links = use_resource(move || async move {
        let store = backend().fresh_store().await;
        match site_profile(&store).await {
            Ok(profile) => profile.map(|p| p.social_links).unwrap_or_default(),
            Err(e) => {
                tracing::warn!("footer could not load profile: {e}");
                Default::default()
            }
        }
    });
    let links = links().unwrap_or_default();
    let year = Utc::now().year();

    rsx! {
        footer {
            class: "site-footer",
            div {
                class: "footer-columns",
                div {
                    class: "footer-column",
                    h3 { "Quick links" }
                    {children}
                }
                div {
                    class: "footer-column",
                    h3 { "Connect" }
                    if let Some(url) = links.github {
                        a { href: "{url}", target: "_blank", rel: "noopener noreferrer",
                            Icon { icon: FaGithub, width: 14, height: 14 }
                            " GitHub"
                        }
                    }
                    if let Some(url) = links.linkedin {
                        a { href: "{url}", target: "_blank", rel: "noopener noreferrer",
                            Icon { icon: FaLinkedin, width: 14, height: 14 }
                            " LinkedIn"
                        }
                    }
                    if let Some(url) = links.twitter {
                        a { href: "{url}", target: "_blank", rel: "noopener noreferrer",
                            Icon { icon: FaTwitter, width: 14, height: 14 }
                            " Twitter"
                        }
                    }
                }
            }
            p { class: "footer-copy", "© {year} Portfolio. All rights reserved." }
        }
    }
}
