//! The navigation bar shown on every protected page.

use maud::{Markup, html};

use crate::endpoints;

struct Link {
    url: &'static str,
    title: &'static str,
    is_current: bool,
}

impl Link {
    fn into_desktop_html(self) -> Markup {
        let style = if self.is_current {
            "block py-2 px-3 text-white bg-blue-700 rounded-sm md:bg-transparent \
            md:text-blue-700 md:p-0 dark:text-white md:dark:text-blue-500"
        } else {
            "block py-2 px-3 text-gray-900 rounded-sm hover:bg-gray-100 \
            md:hover:bg-transparent md:border-0 md:hover:text-blue-700 md:p-0 \
            dark:text-white md:dark:hover:text-blue-500 dark:hover:bg-gray-700 \
            dark:hover:text-white md:dark:hover:bg-transparent"
        };

        html! {
            li
            {
                a href=(self.url)
                    class=(style)
                    aria-current=[self.is_current.then_some("page")]
                {
                    (self.title)
                }
            }
        }
    }

    fn into_mobile_html(self) -> Markup {
        let style = if self.is_current {
            "inline-flex flex-col items-center justify-center px-2 \
            text-blue-600 dark:text-blue-500"
        } else {
            "inline-flex flex-col items-center justify-center px-2 \
            text-gray-500 dark:text-gray-400 hover:text-blue-600 \
            dark:hover:text-blue-500"
        };

        html! {
            a href=(self.url) class=(style)
            {
                span class="text-sm" { (self.title) }
            }
        }
    }
}

/// The navigation bar.
pub struct NavBar {
    links: Vec<Link>,
}

impl NavBar {
    /// Create a navigation bar with the link matching `active_endpoint`
    /// highlighted.
    pub fn new(active_endpoint: &str) -> Self {
        let links = vec![
            Link {
                url: endpoints::DASHBOARD_VIEW,
                title: "Dashboard",
                is_current: active_endpoint == endpoints::DASHBOARD_VIEW,
            },
            Link {
                url: endpoints::TRANSACTIONS_VIEW,
                title: "Transactions",
                is_current: active_endpoint == endpoints::TRANSACTIONS_VIEW,
            },
            Link {
                url: endpoints::WALLETS_VIEW,
                title: "Wallets",
                is_current: active_endpoint == endpoints::WALLETS_VIEW,
            },
            Link {
                url: endpoints::CATEGORIES_VIEW,
                title: "Categories",
                is_current: active_endpoint == endpoints::CATEGORIES_VIEW,
            },
            Link {
                url: endpoints::BUDGETS_VIEW,
                title: "Budgets",
                is_current: active_endpoint == endpoints::BUDGETS_VIEW,
            },
            Link {
                url: endpoints::GOALS_VIEW,
                title: "Goals",
                is_current: active_endpoint == endpoints::GOALS_VIEW,
            },
            Link {
                url: endpoints::SUBSCRIPTIONS_VIEW,
                title: "Subscriptions",
                is_current: active_endpoint == endpoints::SUBSCRIPTIONS_VIEW,
            },
            Link {
                url: endpoints::IMPORT_VIEW,
                title: "Import",
                is_current: active_endpoint == endpoints::IMPORT_VIEW,
            },
        ];

        Self { links }
    }

    /// Render the navigation bar.
    pub fn into_html(self) -> Markup {
        html! {
            (self.desktop_nav_bar())
            (Self::mobile_nav_bar(self.links))
        }
    }

    fn desktop_nav_bar(&self) -> Markup {
        html! {
            nav class="hidden lg:block bg-white border-gray-200 dark:bg-gray-900"
            {
                div class="max-w-(--breakpoint-xl) flex flex-wrap items-center justify-between mx-auto p-4"
                {
                    a
                        href=(endpoints::DASHBOARD_VIEW)
                        class="flex items-center space-x-3 rtl:space-x-reverse"
                    {
                        img src="/static/favicon-32x32.png" class="h-8" alt="Centavo Logo";
                        span class="self-center text-2xl font-semibold whitespace-nowrap dark:text-white" { "Centavo" }
                    }

                    div class="w-auto" id="navbar-default"
                    {
                        ul class="font-medium flex p-0 border-gray-100 rounded-lg flex-row space-x-8 rtl:space-x-reverse mt-0 border-0 bg-white dark:bg-gray-900 dark:border-gray-700"
                        {
                            @for link in &self.links
                            {
                                (Link {
                                    url: link.url,
                                    title: link.title,
                                    is_current: link.is_current,
                                }.into_desktop_html())
                            }

                            li
                            {
                                a href=(endpoints::LOG_OUT)
                                    class="block py-2 px-3 text-gray-900 rounded-sm hover:bg-gray-100 md:hover:bg-transparent md:border-0 md:hover:text-blue-700 md:p-0 dark:text-white md:dark:hover:text-blue-500 dark:hover:bg-gray-700 dark:hover:text-white md:dark:hover:bg-transparent"
                                {
                                    "Log out"
                                }
                            }
                        }
                    }
                }
            }
        }
    }

    /// A bottom navigation bar for small screens.
    ///
    /// The first three links get their own button, the rest go into a "More"
    /// dropdown.
    fn mobile_nav_bar(links: Vec<Link>) -> Markup {
        let mut links = links.into_iter();
        let main_links: Vec<Link> = links.by_ref().take(3).collect();
        let more_links: Vec<Link> = links.collect();
        let more_is_current = more_links.iter().any(|link| link.is_current);

        let more_style = if more_is_current {
            "inline-flex flex-col items-center justify-center px-2 \
            text-blue-600 dark:text-blue-500 cursor-pointer list-none"
        } else {
            "inline-flex flex-col items-center justify-center px-2 \
            text-gray-500 dark:text-gray-400 hover:text-blue-600 \
            dark:hover:text-blue-500 cursor-pointer list-none"
        };

        html! {
            nav class="lg:hidden fixed bottom-0 left-0 z-40 w-full h-[calc(4rem+env(safe-area-inset-bottom))] pb-[env(safe-area-inset-bottom)] bg-white border-t border-gray-200 dark:bg-gray-900 dark:border-gray-700"
            {
                div class="grid h-16 max-w-lg grid-cols-4 mx-auto font-medium"
                {
                    @for link in main_links
                    {
                        (link.into_mobile_html())
                    }

                    details class="relative inline-flex flex-col items-center justify-center"
                    {
                        summary class=(more_style)
                        {
                            span class="text-sm" { "More" }
                        }

                        div class="absolute bottom-16 right-0 w-48 bg-white border border-gray-200 rounded-lg shadow-lg dark:bg-gray-800 dark:border-gray-700"
                        {
                            ul class="py-2 text-sm text-gray-700 dark:text-gray-200"
                            {
                                @for link in more_links
                                {
                                    li
                                    {
                                        a href=(link.url)
                                            class="block px-4 py-2 hover:bg-gray-100 dark:hover:bg-gray-700"
                                        {
                                            (link.title)
                                        }
                                    }
                                }

                                li
                                {
                                    a href=(endpoints::LOG_OUT)
                                        class="block px-4 py-2 hover:bg-gray-100 dark:hover:bg-gray-700"
                                    {
                                        "Log out"
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod nav_bar_tests {
    use scraper::Html;

    use crate::endpoints;

    use super::NavBar;

    #[test]
    fn highlights_active_link() {
        let markup = NavBar::new(endpoints::WALLETS_VIEW).into_html();
        let html = Html::parse_fragment(&markup.into_string());

        let selector = scraper::Selector::parse("a[aria-current=page]").unwrap();
        let active: Vec<_> = html.select(&selector).collect();

        assert_eq!(active.len(), 1);
        assert_eq!(
            active[0].attr("href"),
            Some(endpoints::WALLETS_VIEW),
            "the active link should point at the wallets page"
        );
    }

    #[test]
    fn includes_log_out_link() {
        let markup = NavBar::new(endpoints::DASHBOARD_VIEW).into_html();
        let html = Html::parse_fragment(&markup.into_string());

        let selector = scraper::Selector::parse("a").unwrap();
        let has_log_out = html
            .select(&selector)
            .any(|element| element.attr("href") == Some(endpoints::LOG_OUT));

        assert!(has_log_out);
    }
}
