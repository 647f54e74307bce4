//! The navigation bar shown at the top of every page behind the log-in.

use maud::{Markup, html};

use crate::endpoints;

/// The pages reachable from the navigation bar, in display order.
const PAGES: [(&str, &str); 2] = [
    (endpoints::DASHBOARD_VIEW, "Dashboard"),
    (endpoints::SETTINGS_VIEW, "Settings"),
];

const LINK_STYLE: &str = "block py-2 px-3 text-gray-900 rounded-sm hover:bg-gray-100
    md:hover:bg-transparent md:border-0 md:hover:text-blue-700 md:p-0
    dark:text-white md:dark:hover:text-blue-500 dark:hover:bg-gray-700
    dark:hover:text-white md:dark:hover:bg-transparent";

const CURRENT_LINK_STYLE: &str = "block py-2 px-3 text-white bg-blue-700 rounded-sm
    md:bg-transparent md:text-blue-700 md:p-0 dark:text-white md:dark:text-blue-500";

/// A page link in the navigation bar.
struct PageLink {
    url: &'static str,
    title: &'static str,
    is_current: bool,
}

pub struct NavBar {
    pages: Vec<PageLink>,
}

impl NavBar {
    /// Get the navigation bar with the page at `active_endpoint`, if any,
    /// marked as the current page.
    pub fn new(active_endpoint: &str) -> NavBar {
        let pages = PAGES
            .iter()
            .map(|&(url, title)| PageLink {
                url,
                title,
                is_current: url == active_endpoint,
            })
            .collect();

        NavBar { pages }
    }

    pub fn into_html(self) -> Markup {
        html!(
            nav class="bg-white border-gray-200 dark:bg-gray-900"
            {
                div
                    class="max-w-screen-xl flex flex-wrap items-center justify-between mx-auto p-4"
                {
                    a href=(endpoints::ROOT) class="flex items-center"
                    {
                        span
                            class="self-center text-2xl font-semibold whitespace-nowrap dark:text-white"
                        {
                            "Finanzas"
                        }
                    }

                    ul class="font-medium flex flex-row gap-4 md:gap-8 p-0 bg-white dark:bg-gray-900"
                    {
                        @for page in self.pages {
                            li
                            {
                                a
                                    href=(page.url)
                                    class=(if page.is_current { CURRENT_LINK_STYLE } else { LINK_STYLE })
                                    aria-current=[page.is_current.then_some("page")]
                                {
                                    (page.title)
                                }
                            }
                        }

                        li { a href=(endpoints::LOG_OUT) class=(LINK_STYLE) { "Log out" } }
                    }
                }
            }
        )
    }
}

#[cfg(test)]
mod nav_bar_tests {
    use scraper::{Html, Selector};

    use crate::{endpoints, navigation::NavBar};

    fn current_pages(nav_bar: NavBar) -> Vec<String> {
        let html = Html::parse_fragment(&nav_bar.into_html().into_string());

        html.select(&Selector::parse("a[aria-current=page]").unwrap())
            .map(|link| link.value().attr("href").unwrap_or_default().to_owned())
            .collect()
    }

    #[test]
    fn set_active_endpoint() {
        for endpoint in [endpoints::DASHBOARD_VIEW, endpoints::SETTINGS_VIEW] {
            assert_eq!(current_pages(NavBar::new(endpoint)), vec![endpoint]);
        }
    }

    #[test]
    fn other_endpoints_have_no_current_page() {
        for endpoint in [
            endpoints::ROOT,
            endpoints::INTERNAL_ERROR_VIEW,
            endpoints::LOG_IN_VIEW,
            endpoints::LOG_OUT,
            endpoints::ANALYSIS_API,
        ] {
            assert!(
                current_pages(NavBar::new(endpoint)).is_empty(),
                "want no current page for {endpoint}"
            );
        }
    }

    #[test]
    fn log_out_link_is_always_shown() {
        let html = Html::parse_fragment(&NavBar::new(endpoints::DASHBOARD_VIEW).into_html().into_string());
        let selector = Selector::parse(&format!("a[href=\"{}\"]", endpoints::LOG_OUT)).unwrap();

        let link = html.select(&selector).next().expect("No log out link");
        assert_eq!(link.text().collect::<String>(), "Log out");
    }
}
