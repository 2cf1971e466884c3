use std::collections::BTreeMap;

use common::draft::sync::RemoteSynchronizer;
use common::draft::{DraftManager, DraftState};
use common::model::section::SectionKind;
use yew::events::MouseEvent;
use yew::{classes, html, Component, Context, Html};

use crate::components::layout::YourLayout;
use crate::components::preview::PublishedSection;
use crate::components::section_editor::SectionEditor;
use crate::storage::browser_mirror;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Section(SectionKind),
    Layout,
}

pub enum Msg {
    Open(Page),
    Published(PublishedSection),
    Reset(SectionKind),
}

pub struct App {
    page: Page,
    published: BTreeMap<SectionKind, PublishedSection>,
}

impl Component for App {
    type Message = Msg;
    type Properties = ();

    fn create(_ctx: &Context<Self>) -> Self {
        Self {
            page: Page::Section(SectionKind::Navbar),
            published: restore_published(),
        }
    }

    fn update(&mut self, _ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::Open(page) => {
                if self.page == page {
                    return false;
                }
                self.page = page;
            }
            Msg::Published(section) => {
                self.published.insert(section.kind, section);
            }
            Msg::Reset(kind) => {
                if self.published.remove(&kind).is_none() {
                    return false;
                }
            }
        }
        true
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let link = ctx.link();
        let tab = |page: Page, label: &'static str| {
            html! {
                <button
                    class={classes!("nav-tab", (self.page == page).then_some("active"))}
                    onclick={link.callback(move |_: MouseEvent| Msg::Open(page))}
                >
                    { label }
                </button>
            }
        };

        html! {
            <div class="app">
                <nav class="app-nav">
                    { for SectionKind::ALL.into_iter().map(|kind| tab(Page::Section(kind), kind.label())) }
                    { tab(Page::Layout, "Your Layout") }
                </nav>
                <main>
                    {
                        match self.page {
                            Page::Section(kind) => html! {
                                <SectionEditor
                                    key={kind.as_str()}
                                    {kind}
                                    on_publish={link.callback(Msg::Published)}
                                    on_reset={link.callback(Msg::Reset)}
                                />
                            },
                            Page::Layout => html! {
                                <YourLayout sections={self.published.values().cloned().collect::<Vec<_>>()} />
                            },
                        }
                    }
                </main>
            </div>
        }
    }
}

/// Published sections survive a reload through the local mirror: the last
/// draft of each kind that is still in the published state.
fn restore_published() -> BTreeMap<SectionKind, PublishedSection> {
    SectionKind::ALL
        .into_iter()
        .filter_map(|kind| {
            let manager = DraftManager::restore_last(kind, browser_mirror(), RemoteSynchronizer::default());
            (manager.state() == DraftState::Published).then(|| {
                (
                    kind,
                    PublishedSection {
                        kind,
                        identifier: manager.identifier().to_string(),
                        fields: manager.published_fields(),
                    },
                )
            })
        })
        .collect()
}
