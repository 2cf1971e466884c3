//! "Your Layout": every published section stacked in page order.

use common::model::section::SectionKind;
use yew::prelude::*;

use super::preview::{render_section, PublishedSection};

#[derive(Properties, PartialEq, Clone)]
pub struct LayoutProps {
    pub sections: Vec<PublishedSection>,
}

#[function_component(YourLayout)]
pub fn your_layout(props: &LayoutProps) -> Html {
    if props.sections.is_empty() {
        return html! {
            <div class="layout-empty">
                <p>{"Nothing published yet. Save a section and publish it to see it here."}</p>
            </div>
        };
    }

    let mut sections: Vec<&PublishedSection> = props.sections.iter().collect();
    sections.sort_by_key(|section| page_order(section.kind));

    html! {
        <div class="layout-page">
            { for sections.into_iter().map(|section| html! {
                <div class="layout-section" key={section.kind.as_str()} title={section.identifier.clone()}>
                    { render_section(section.kind, &section.fields) }
                </div>
            }) }
        </div>
    }
}

fn page_order(kind: SectionKind) -> usize {
    SectionKind::ALL
        .iter()
        .position(|k| *k == kind)
        .unwrap_or(SectionKind::ALL.len())
}
